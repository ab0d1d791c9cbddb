//! # OpenH264 Decode Backend
//!
//! Native software engine behind the backend seam, built on Cisco's
//! openh264. Two impedance mismatches are absorbed here:
//!
//! - The feed scheduler slices the stream by byte budget, so submitted
//!   chunks can end mid-NAL-unit. openh264 wants whole units, so bytes
//!   are accumulated and only the complete-unit prefix (everything before
//!   the last start code seen) is handed to the decoder; the tail waits
//!   for more bytes or a flush.
//! - The library decodes synchronously, so any picture a submission
//!   produces is pumped straight into the frame sink — from the caller's
//!   side it looks the same as an engine that calls back later.

use crate::codec::CodecCandidate;
use crate::engine::{BackendError, DecodeBackend, EncodedChunk};
use crate::pipeline::{DecodedFrame, FrameSink, PixelFormat};
use bytes::{BufMut, BytesMut};
use openh264::decoder::{DecodedYUV, Decoder};
use openh264::formats::YUVSource;
use std::sync::Arc;

/// Profile IDCs openh264 will actually decode: Baseline, Main, Extended,
/// High. The scalable/multiview profiles are rejected at configure time.
const SUPPORTED_PROFILES: [u8; 4] = [66, 77, 88, 100];

pub struct OpenH264Backend {
    decoder: Option<Decoder>,
    sink: Arc<dyn FrameSink>,
    /// Bytes received but not yet decoded (may end mid-unit).
    pending: BytesMut,
    /// Timestamps of the most recent submission; stamped onto frames the
    /// decoder emits, including at flush.
    last_pts_us: i64,
    last_duration_us: i64,
}

impl OpenH264Backend {
    pub fn new(sink: Arc<dyn FrameSink>) -> Self {
        Self {
            decoder: None,
            sink,
            pending: BytesMut::new(),
            last_pts_us: 0,
            last_duration_us: 0,
        }
    }

    /// Decode start-code-delimited units one at a time. One decode call
    /// emits at most one picture, so a buffer holding several pictures
    /// must be walked unit by unit.
    fn decode_bytes(&mut self, data: &[u8]) -> Result<(), BackendError> {
        if data.is_empty() {
            return Ok(());
        }
        let decoder = self
            .decoder
            .as_mut()
            .ok_or_else(|| BackendError::Engine("decoder not configured".into()))?;

        for unit in split_units(data) {
            match decoder.decode(unit) {
                Ok(Some(yuv)) => {
                    let frame = frame_from_yuv(&yuv, self.last_pts_us, self.last_duration_us);
                    self.sink.on_frame(frame);
                }
                // The decoder wants more data before it can emit a picture.
                Ok(None) => {}
                Err(err) => return Err(BackendError::Engine(err.to_string())),
            }
        }
        Ok(())
    }
}

impl DecodeBackend for OpenH264Backend {
    fn name(&self) -> &'static str {
        "OpenH264"
    }

    fn configure(&mut self, candidate: &CodecCandidate) -> Result<(), BackendError> {
        let profile = candidate.profile_idc().ok_or_else(|| {
            BackendError::CodecRejected(format!("unparseable descriptor {candidate}"))
        })?;
        if !SUPPORTED_PROFILES.contains(&profile) {
            return Err(BackendError::CodecRejected(format!(
                "profile_idc {profile} not supported"
            )));
        }

        let decoder = Decoder::new().map_err(|e| BackendError::Engine(e.to_string()))?;
        self.decoder = Some(decoder);
        self.pending.clear();
        Ok(())
    }

    fn submit(&mut self, chunk: &EncodedChunk) -> Result<(), BackendError> {
        self.pending.extend_from_slice(&chunk.data);
        self.last_pts_us = chunk.pts_us;
        self.last_duration_us = chunk.duration_us;

        // Only units whose terminating start code has arrived are known
        // complete; the rest stays pending.
        if let Some(boundary) = last_unit_boundary(&self.pending) {
            let ready = self.pending.split_to(boundary);
            self.decode_bytes(&ready.freeze())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        let tail = self.pending.split().freeze();
        self.decode_bytes(&tail)
    }
}

/// Split a start-code-delimited buffer into whole units, each keeping its
/// start code. Bytes before the first start code are skipped.
fn split_units(data: &[u8]) -> Vec<&[u8]> {
    let mut starts = Vec::new();
    let mut i = 0;
    while i + 3 <= data.len() {
        if data[i] == 0 && data[i + 1] == 0 && data[i + 2] == 1 {
            let begin = if i > 0 && data[i - 1] == 0 { i - 1 } else { i };
            starts.push(begin);
            i += 3;
        } else {
            i += 1;
        }
    }
    starts
        .iter()
        .enumerate()
        .map(|(idx, &begin)| {
            let end = starts.get(idx + 1).copied().unwrap_or(data.len());
            &data[begin..end]
        })
        .collect()
}

/// Offset of the last start code in `data` (its leading zero included),
/// i.e. where the still-unterminated final unit begins. `None` when no
/// boundary other than the stream head is known yet.
fn last_unit_boundary(data: &[u8]) -> Option<usize> {
    if data.len() < 3 {
        return None;
    }
    for i in (0..=data.len() - 3).rev() {
        if data[i] == 0 && data[i + 1] == 0 && data[i + 2] == 1 {
            // Fold a preceding zero into the boundary: 4-byte form.
            let begin = if i > 0 && data[i - 1] == 0 { i - 1 } else { i };
            if begin == 0 {
                return None;
            }
            return Some(begin);
        }
    }
    None
}

/// Repack the decoder's strided planes into a tight I420 buffer.
fn frame_from_yuv(yuv: &DecodedYUV, pts_us: i64, duration_us: i64) -> DecodedFrame {
    let (width, height) = yuv.dimensions();
    let (stride_y, stride_u, stride_v) = yuv.strides();

    let mut data = BytesMut::with_capacity(width * height * 3 / 2);
    copy_plane(&mut data, yuv.y(), stride_y, width, height);
    copy_plane(&mut data, yuv.u(), stride_u, width / 2, height / 2);
    copy_plane(&mut data, yuv.v(), stride_v, width / 2, height / 2);

    DecodedFrame {
        data: data.freeze(),
        format: PixelFormat::I420,
        width: width as u32,
        height: height as u32,
        pts_us,
        duration_us,
    }
}

fn copy_plane(dst: &mut BytesMut, src: &[u8], stride: usize, width: usize, height: usize) {
    for row in 0..height {
        let begin = row * stride;
        dst.put_slice(&src[begin..begin + width]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ranked_candidates;
    use crate::pipeline::FramePipeline;

    #[test]
    fn test_rejects_exotic_profiles_accepts_baseline() {
        let pipeline = Arc::new(FramePipeline::new());
        let mut backend = OpenH264Backend::new(pipeline);

        // First ranked candidate is Baseline 3.0.
        assert!(backend.configure(&ranked_candidates()[0]).is_ok());

        // Scalable Baseline (83) is not in openh264's repertoire.
        let scalable = CodecCandidate::new(83, 0x00, 30);
        assert!(matches!(
            backend.configure(&scalable),
            Err(BackendError::CodecRejected(_))
        ));
    }

    #[test]
    fn test_flush_before_configure_fails() {
        let pipeline = Arc::new(FramePipeline::new());
        let mut backend = OpenH264Backend::new(pipeline);
        let chunk = EncodedChunk {
            data: bytes::Bytes::from_static(&[0, 0, 0, 1, 0x41]),
            pts_us: 0,
            duration_us: 16_000,
            keyframe: false,
        };
        // A lone unit has no terminating start code, so submit buffers it
        // and only the flush trips over the missing decoder.
        assert!(backend.submit(&chunk).is_ok());
        assert!(backend.flush().is_err());
    }

    #[test]
    fn test_split_units_keeps_start_codes() {
        let stream: &[u8] = &[
            0x00, 0x00, 0x00, 0x01, 0x67, 0x42, //
            0x00, 0x00, 0x01, 0x68, //
            0x00, 0x00, 0x00, 0x01, 0x65, 0x88,
        ];
        let units = split_units(stream);
        assert_eq!(units.len(), 3);
        assert_eq!(units[0], &stream[0..6]);
        assert_eq!(units[1], &stream[6..10]);
        assert_eq!(units[2], &stream[10..]);
    }

    #[test]
    fn test_last_unit_boundary() {
        // No start code at all.
        assert_eq!(last_unit_boundary(&[0x41, 0x9a, 0x00]), None);
        // Single unit at the head: no boundary known yet.
        assert_eq!(last_unit_boundary(&[0x00, 0x00, 0x00, 0x01, 0x67]), None);
        // Second start code marks where the final unit begins.
        assert_eq!(
            last_unit_boundary(&[
                0x00, 0x00, 0x00, 0x01, 0x67, 0x42, //
                0x00, 0x00, 0x00, 0x01, 0x68,
            ]),
            Some(6)
        );
        // 3-byte form, zero not folded from payload.
        assert_eq!(
            last_unit_boundary(&[
                0x00, 0x00, 0x01, 0x67, 0x42, //
                0x00, 0x00, 0x01, 0x68,
            ]),
            Some(5)
        );
    }
}
