//! # Decoder Engine - Negotiation and Submission
//!
//! Wraps one concrete decode engine behind the capability surface
//! {configure, submit, on_frame, on_error} and owns codec negotiation:
//! ranked candidate descriptors are offered in order until the engine
//! accepts one, and a total rejection surfaces a single aggregated error
//! that keeps every per-candidate reason.
//!
//! Submission is fire-and-forget. Engine failures — whether raised
//! synchronously at submit or asynchronously from the engine's own
//! context — all travel the frame pipeline's error channel, so callers
//! see one uniform contract over any engine.

use crate::codec::{ranked_candidates, CodecCandidate};
use crate::pipeline::{FrameSink, PipelineError};
use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Nominal duration tagged onto every submitted chunk (16 ms).
pub const NOMINAL_CHUNK_DURATION_US: i64 = 16_000;

// ============================================================================
// Backend Seam
// ============================================================================

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("codec rejected: {0}")]
    CodecRejected(String),
    #[error("engine failure: {0}")]
    Engine(String),
}

/// An encoded chunk handed to a decode backend, with the presentation
/// timestamp that must come back on the matching frame.
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    pub data: Bytes,
    pub pts_us: i64,
    pub duration_us: i64,
    pub keyframe: bool,
}

/// Capability surface of one concrete decode engine.
///
/// Backends receive a [`FrameSink`] at construction and deliver decoded
/// frames and asynchronous errors through it, on whatever context the
/// underlying engine calls back from.
pub trait DecodeBackend: Send {
    fn name(&self) -> &'static str;

    /// Offer one codec descriptor. `Ok` means the engine accepted it and
    /// is ready for submissions.
    fn configure(&mut self, candidate: &CodecCandidate) -> Result<(), BackendError>;

    /// Push one encoded chunk into the engine. Chunk boundaries carry no
    /// meaning: the feed scheduler slices the stream by byte budget, so a
    /// chunk may end mid-NAL-unit and engines must frame internally.
    fn submit(&mut self, chunk: &EncodedChunk) -> Result<(), BackendError>;

    /// The stream is drained; decode anything still buffered.
    fn flush(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

// ============================================================================
// Errors and State
// ============================================================================

/// Every candidate the engine turned down, in the order attempted.
#[derive(Debug)]
pub struct NegotiationFailure {
    pub attempts: Vec<CandidateRejection>,
}

#[derive(Debug)]
pub struct CandidateRejection {
    pub candidate: CodecCandidate,
    pub reason: String,
}

impl fmt::Display for NegotiationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rejection) in self.attempts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", rejection.candidate, rejection.reason)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested decoder identity does not exist in this build.
    #[error("unsupported decoder {0:?}")]
    UnsupportedDecoder(String),
    /// Every ranked candidate was rejected. Fatal to the session.
    #[error("codec negotiation failed:\n{0}")]
    ConfigurationFailed(NegotiationFailure),
    #[error("invalid decoder options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unconfigured,
    Configuring,
    Ready,
    ConfigurationFailed,
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Submission policy knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Tag the first submitted chunk as a keyframe. Off by default: the
    /// pipeline historically marks every chunk as a delta unit and relies
    /// on parameter-set priming to carry the IDR, so keyframe tagging is a
    /// policy decision rather than a baked-in assumption.
    pub mark_first_keyframe: bool,
    /// Nominal duration stamped on each chunk.
    pub chunk_duration_us: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mark_first_keyframe: false,
            chunk_duration_us: NOMINAL_CHUNK_DURATION_US,
        }
    }
}

// ============================================================================
// Decoder Engine
// ============================================================================

/// State machine: `Unconfigured -> Configuring -> Ready |
/// ConfigurationFailed`.
pub struct DecoderEngine {
    backend: Box<dyn DecodeBackend>,
    sink: Arc<dyn FrameSink>,
    config: EngineConfig,
    state: EngineState,
    accepted: Option<CodecCandidate>,
    submitted_chunks: u64,
}

impl fmt::Debug for DecoderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderEngine")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("accepted", &self.accepted)
            .field("submitted_chunks", &self.submitted_chunks)
            .finish()
    }
}

impl DecoderEngine {
    pub fn new(backend: Box<dyn DecodeBackend>, sink: Arc<dyn FrameSink>) -> Self {
        Self::with_config(backend, sink, EngineConfig::default())
    }

    pub fn with_config(
        backend: Box<dyn DecodeBackend>,
        sink: Arc<dyn FrameSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            backend,
            sink,
            config,
            state: EngineState::Unconfigured,
            accepted: None,
            submitted_chunks: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The candidate the engine accepted, once `Ready`.
    pub fn accepted_candidate(&self) -> Option<&CodecCandidate> {
        self.accepted.as_ref()
    }

    pub fn chunk_duration_us(&self) -> i64 {
        self.config.chunk_duration_us
    }

    /// Offer ranked candidates until one sticks. Stops at the first
    /// acceptance; a clean sweep of rejections fails with one aggregated
    /// error listing every attempt in order.
    pub fn negotiate(&mut self) -> Result<CodecCandidate, EngineError> {
        self.state = EngineState::Configuring;
        let mut attempts = Vec::new();

        for candidate in ranked_candidates() {
            match self.backend.configure(candidate) {
                Ok(()) => {
                    tracing::debug!(
                        backend = self.backend.name(),
                        codec = %candidate,
                        attempts = attempts.len() + 1,
                        "codec negotiated"
                    );
                    self.state = EngineState::Ready;
                    self.accepted = Some(candidate.clone());
                    return Ok(candidate.clone());
                }
                Err(err) => {
                    attempts.push(CandidateRejection {
                        candidate: candidate.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::warn!(
            backend = self.backend.name(),
            attempts = attempts.len(),
            "every codec candidate rejected"
        );
        self.state = EngineState::ConfigurationFailed;
        Err(EngineError::ConfigurationFailed(NegotiationFailure {
            attempts,
        }))
    }

    /// Submit encoded bytes with their presentation timestamp.
    ///
    /// Fire-and-forget: any failure is redirected to the frame pipeline's
    /// error channel, never returned here, so submission reads the same
    /// whether the engine fails now or from its callback context later.
    pub fn submit(&mut self, data: Bytes, pts_us: i64) {
        if self.state != EngineState::Ready {
            self.sink.on_error(PipelineError::Submission {
                pts_us,
                reason: format!("engine not ready ({:?})", self.state),
            });
            return;
        }

        let chunk = EncodedChunk {
            data,
            pts_us,
            duration_us: self.config.chunk_duration_us,
            keyframe: self.config.mark_first_keyframe && self.submitted_chunks == 0,
        };
        self.submitted_chunks += 1;

        if let Err(err) = self.backend.submit(&chunk) {
            self.sink.on_error(PipelineError::Submission {
                pts_us,
                reason: err.to_string(),
            });
        }
    }

    /// Tell the engine no more bytes are coming for now, so it can decode
    /// whatever it still has buffered. Same fire-and-forget error policy
    /// as [`submit`](Self::submit).
    pub fn flush(&mut self) {
        if self.state != EngineState::Ready {
            return;
        }
        if let Err(err) = self.backend.flush() {
            self.sink.on_error(PipelineError::Decode(err.to_string()));
        }
    }
}

// ============================================================================
// Decoder Identity and Creation
// ============================================================================

/// Decoder identities this build can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    OpenH264,
}

impl DecoderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenH264 => "OpenH264",
        }
    }

    /// Resolve an identity from a host-supplied name. The empty string
    /// selects the default engine; unknown names resolve to nothing.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.is_empty() {
            return Some(Self::default());
        }
        match name {
            "OpenH264" | "openh264" => Some(Self::OpenH264),
            _ => None,
        }
    }
}

impl Default for DecoderKind {
    fn default() -> Self {
        Self::OpenH264
    }
}

/// Decoder-creation options: a structured key-value set, optionally
/// pre-serialized as JSON. `DecoderName` and `mDecoderName` are legacy
/// spellings some hosts still send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecoderOptions {
    #[serde(default)]
    pub decoder: Option<String>,
    #[serde(default, rename = "DecoderName")]
    pub decoder_name: Option<String>,
    #[serde(default, rename = "mDecoderName")]
    pub m_decoder_name: Option<String>,
}

impl DecoderOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// First non-empty of `decoder`, `mDecoderName`, `DecoderName`; empty
    /// if the host left identity unspecified.
    pub fn requested_name(&self) -> &str {
        [&self.decoder, &self.m_decoder_name, &self.decoder_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.is_empty())
            .unwrap_or("")
    }
}

/// Build a [`DecoderEngine`] over the requested backend. The engine still
/// needs `negotiate()` before it accepts submissions.
pub fn create_decoder(
    options: &DecoderOptions,
    sink: Arc<dyn FrameSink>,
) -> Result<DecoderEngine, EngineError> {
    let name = options.requested_name();
    let kind = DecoderKind::from_name(name)
        .ok_or_else(|| EngineError::UnsupportedDecoder(name.to_string()))?;
    let backend = make_backend(kind, sink.clone())?;
    Ok(DecoderEngine::new(backend, sink))
}

fn make_backend(
    kind: DecoderKind,
    sink: Arc<dyn FrameSink>,
) -> Result<Box<dyn DecodeBackend>, EngineError> {
    match kind {
        DecoderKind::OpenH264 => {
            #[cfg(feature = "software-decode")]
            {
                Ok(Box::new(crate::openh264_backend::OpenH264Backend::new(
                    sink,
                )))
            }
            #[cfg(not(feature = "software-decode"))]
            {
                let _ = sink;
                Err(EngineError::UnsupportedDecoder(
                    "OpenH264 (software-decode disabled)".into(),
                ))
            }
        }
    }
}

/// Decoder identities supported in the current build, for capability
/// discovery by the host.
pub fn enumerate_decoders() -> Vec<&'static str> {
    #[cfg(feature = "software-decode")]
    {
        vec![DecoderKind::OpenH264.name()]
    }
    #[cfg(not(feature = "software-decode"))]
    {
        Vec::new()
    }
}

/// Enumeration in the JSON shape hosts expect: `{"DecoderNames": [...]}`.
pub fn enumerate_decoders_json() -> serde_json::Value {
    serde_json::json!({ "DecoderNames": enumerate_decoders() })
}

// ============================================================================
// Tests
// ============================================================================
