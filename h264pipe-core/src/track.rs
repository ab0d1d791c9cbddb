//! # Container Track Interface
//!
//! The MP4/MOV box grammar lives in the container collaborator; this
//! module only models what it hands over per video track: a codec
//! identifier, the one-time parameter-set payloads, and an ordered list of
//! sample byte ranges into the container buffer. Samples are referenced,
//! not copied, until reformatting.

use crate::annexb::ParameterSets;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codec identifiers this pipeline handles.
const ACCEPTED_CODECS: [&str; 2] = ["avc1", "h264"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("codec {0:?} is not handled by this pipeline")]
    UnhandledCodec(String),
    #[error("sample range {position}+{size} is outside the container buffer ({len} bytes)")]
    SampleOutOfRange { position: u64, size: u32, len: usize },
}

/// Byte range of one sample inside the original container buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub position: u64,
    pub size: u32,
}

/// Everything the container parser delivers for one video track.
#[derive(Debug, Clone)]
pub struct TrackDescriptor {
    /// Sample-entry codec identifier, e.g. `avc1`.
    pub codec: String,
    pub sps: Vec<Bytes>,
    pub pps: Bytes,
    pub samples: Vec<SampleRange>,
}

impl TrackDescriptor {
    /// Tracks carrying a codec this pipeline does not handle are skipped
    /// by the caller.
    pub fn accept(&self) -> Result<(), TrackError> {
        if ACCEPTED_CODECS
            .iter()
            .any(|c| self.codec.eq_ignore_ascii_case(c))
        {
            Ok(())
        } else {
            Err(TrackError::UnhandledCodec(self.codec.clone()))
        }
    }

    /// The track's parameter sets, ready for first-sample priming.
    pub fn parameter_sets(&self) -> ParameterSets {
        ParameterSets::new(self.sps.clone(), self.pps.clone())
    }
}

/// Slice one sample out of the container buffer without copying.
pub fn sample_bytes(buffer: &Bytes, range: SampleRange) -> Result<Bytes, TrackError> {
    let out_of_range = || TrackError::SampleOutOfRange {
        position: range.position,
        size: range.size,
        len: buffer.len(),
    };
    // Checked: a position near u64::MAX must error, not wrap.
    let end = range
        .position
        .checked_add(u64::from(range.size))
        .ok_or_else(out_of_range)?;
    if end > buffer.len() as u64 {
        return Err(out_of_range());
    }
    Ok(buffer.slice(range.position as usize..end as usize))
}
