//! # AVCC to Annex B Reformatting
//!
//! Container samples arrive as length-prefixed NAL units (AVCC): a 4-byte
//! big-endian length followed by that many payload bytes. Decode engines
//! consume the Annex B byte-stream format instead, where every NAL unit is
//! prefixed with a `00 00 00 01` start code. This module performs that
//! rewrite, plus the one-time parameter-set priming a fresh stream needs
//! before its first sample.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Annex B start code (4-byte form).
pub const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Length prefix size used by the container.
const NAL_LENGTH_SIZE: usize = 4;

/// A sample whose length prefixes do not add up. The sample is dropped;
/// the session and any following samples are unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReformatError {
    #[error("truncated NAL unit: declared {declared} bytes, {remaining} remaining")]
    TruncatedNal { declared: usize, remaining: usize },
    #[error("truncated length prefix: {0} trailing bytes")]
    TruncatedLengthPrefix(usize),
}

// ============================================================================
// Parameter Sets
// ============================================================================

/// Sequence and picture parameter sets extracted once per track by the
/// container parser. Immutable for the life of the track.
#[derive(Debug, Clone)]
pub struct ParameterSets {
    sps: Vec<Bytes>,
    pps: Bytes,
}

impl ParameterSets {
    pub fn new(sps: Vec<Bytes>, pps: Bytes) -> Self {
        Self { sps, pps }
    }

    /// Start-code-prefixed priming chunk for the first sample of a stream:
    /// the PPS first, then every SPS, each its own Annex B unit.
    pub fn prime(&self) -> Bytes {
        let total: usize = self.pps.len() + self.sps.iter().map(|s| s.len()).sum::<usize>();
        let mut out = BytesMut::with_capacity(total + START_CODE.len() * (1 + self.sps.len()));
        out.put_slice(&START_CODE);
        out.put_slice(&self.pps);
        for sps in &self.sps {
            out.put_slice(&START_CODE);
            out.put_slice(sps);
        }
        out.freeze()
    }
}

// ============================================================================
// Reformatting
// ============================================================================

/// Rewrite one length-prefixed sample into start-code-delimited form.
///
/// Walks the sample unit by unit: read a 4-byte big-endian length, slice
/// that many payload bytes, emit start code + payload, repeat until the
/// sample is exhausted. A length that runs past the end of the sample
/// fails the whole sample and produces no output.
pub fn avcc_to_annexb(sample: &[u8]) -> Result<Bytes, ReformatError> {
    let mut out = BytesMut::with_capacity(sample.len());
    let mut offset = 0;

    while offset < sample.len() {
        let remaining = sample.len() - offset;
        if remaining < NAL_LENGTH_SIZE {
            return Err(ReformatError::TruncatedLengthPrefix(remaining));
        }
        let declared = u32::from_be_bytes([
            sample[offset],
            sample[offset + 1],
            sample[offset + 2],
            sample[offset + 3],
        ]) as usize;
        offset += NAL_LENGTH_SIZE;

        let remaining = sample.len() - offset;
        if declared > remaining {
            return Err(ReformatError::TruncatedNal {
                declared,
                remaining,
            });
        }

        out.put_slice(&START_CODE);
        out.put_slice(&sample[offset..offset + declared]);
        offset += declared;
    }

    Ok(out.freeze())
}

/// Inverse rewrite: start codes back to 4-byte length prefixes.
///
/// Only understands the 4-byte start code this module emits, and assumes
/// NAL payloads are emulation-prevented (no embedded start codes), which
/// holds for the streams the reformatter produces. Used by the round-trip
/// tests and handy when re-containerizing.
pub fn annexb_to_avcc(stream: &[u8]) -> Vec<u8> {
    let mut starts = Vec::new();
    let mut i = 0;
    while i + START_CODE.len() <= stream.len() {
        if stream[i..i + START_CODE.len()] == START_CODE {
            starts.push(i + START_CODE.len());
            i += START_CODE.len();
        } else {
            i += 1;
        }
    }

    let mut out = Vec::with_capacity(stream.len());
    for (idx, &begin) in starts.iter().enumerate() {
        let end = match starts.get(idx + 1) {
            Some(&next) => next - START_CODE.len(),
            None => stream.len(),
        };
        out.extend_from_slice(&((end - begin) as u32).to_be_bytes());
        out.extend_from_slice(&stream[begin..end]);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn avcc_unit(payload: &[u8]) -> Vec<u8> {
        let mut unit = (payload.len() as u32).to_be_bytes().to_vec();
        unit.extend_from_slice(payload);
        unit
    }

    #[test]
    fn test_single_unit() {
        let sample = avcc_unit(&[0x67, 0x42, 0x00, 0x1e, 0x9a]);
        let annexb = avcc_to_annexb(&sample).unwrap();
        assert_eq!(&annexb[..4], &START_CODE);
        assert_eq!(&annexb[4..], &[0x67, 0x42, 0x00, 0x1e, 0x9a]);
    }

    #[test]
    fn test_output_length_arithmetic() {
        // Output length is sum of payload lengths plus 4 bytes of start
        // code per unit.
        let mut sample = avcc_unit(&[0x65; 12]);
        sample.extend_from_slice(&avcc_unit(&[0x41; 7]));
        sample.extend_from_slice(&avcc_unit(&[]));
        let annexb = avcc_to_annexb(&sample).unwrap();
        assert_eq!(annexb.len(), 12 + 7 + 0 + 3 * START_CODE.len());
    }

    #[test]
    fn test_round_trip() {
        let mut sample = avcc_unit(&[0x65, 0x88, 0x84, 0x27]);
        sample.extend_from_slice(&avcc_unit(&[0x41, 0x9a]));
        let annexb = avcc_to_annexb(&sample).unwrap();
        assert_eq!(annexb_to_avcc(&annexb), sample);
    }

    #[test]
    fn test_truncated_nal_is_rejected_whole() {
        // Declared length runs past the end of the sample: no output at all.
        let mut sample = avcc_unit(&[0x65, 0x01, 0x02]);
        sample.extend_from_slice(&[0x00, 0x00, 0x00, 0x09, 0x41, 0x41]);
        let err = avcc_to_annexb(&sample).unwrap_err();
        assert_eq!(
            err,
            ReformatError::TruncatedNal {
                declared: 9,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_truncated_length_prefix() {
        let sample = [0x00, 0x00, 0x01];
        let err = avcc_to_annexb(&sample).unwrap_err();
        assert_eq!(err, ReformatError::TruncatedLengthPrefix(3));
    }

    #[test]
    fn test_malformed_sample_does_not_poison_the_next() {
        let bad = [0x00, 0x00, 0x00, 0xff, 0x01];
        assert!(avcc_to_annexb(&bad).is_err());

        let good = avcc_unit(&[0x41, 0x9a, 0x02]);
        assert!(avcc_to_annexb(&good).is_ok());
    }

    #[test]
    fn test_prime_order_pps_then_sps() {
        let params = ParameterSets::new(
            vec![Bytes::from_static(&[0x67, 0x42])],
            Bytes::from_static(&[0x68, 0xc9]),
        );
        let primed = params.prime();
        let expected: &[u8] = &[
            0x00, 0x00, 0x00, 0x01, 0x68, 0xc9, // PPS first
            0x00, 0x00, 0x00, 0x01, 0x67, 0x42, // then SPS
        ];
        assert_eq!(&primed[..], expected);
    }

    #[test]
    fn test_prime_multiple_sps() {
        let params = ParameterSets::new(
            vec![
                Bytes::from_static(&[0x67, 0x01]),
                Bytes::from_static(&[0x67, 0x02]),
            ],
            Bytes::from_static(&[0x68]),
        );
        let primed = params.prime();
        let units = annexb_to_avcc(&primed);
        // Three units: PPS, SPS #1, SPS #2.
        assert_eq!(units.len(), 4 + 1 + 4 + 2 + 4 + 2);
        assert_eq!(units[4], 0x68);
    }
}
