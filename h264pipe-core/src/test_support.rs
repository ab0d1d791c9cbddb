//! # Scripted Decode Backend
//!
//! A fake decode engine for exercising negotiation, feeding and frame
//! delivery without a real decoder: it accepts a chosen candidate, records
//! every submitted chunk, and emits canned frames on cue. Used by this
//! crate's own tests and available to hosts that want to dry-run their
//! integration.

use crate::codec::CodecCandidate;
use crate::engine::{BackendError, DecodeBackend, EncodedChunk};
use crate::pipeline::{DecodedFrame, FrameSink, PixelFormat};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What the backend does with submitted chunks.
#[derive(Debug, Clone)]
pub enum SubmitScript {
    /// Emit one canned frame per submitted chunk, carrying the chunk's
    /// timestamp.
    EchoFrame,
    /// Accept chunks silently.
    Silent,
    /// Fail every submission with this reason.
    FailWith(String),
    /// Accept silently until this many bytes have arrived in total, then
    /// emit a single frame stamped with the triggering chunk's timestamp.
    EmitAfterBytes(usize),
}

/// A 16x16 mid-gray I420 frame with the given timestamps.
pub fn test_frame(pts_us: i64, duration_us: i64) -> DecodedFrame {
    const W: u32 = 16;
    const H: u32 = 16;
    let data = vec![0x80u8; (W * H * 3 / 2) as usize];
    DecodedFrame {
        data: data.into(),
        format: PixelFormat::I420,
        width: W,
        height: H,
        pts_us,
        duration_us,
    }
}

pub struct ScriptedBackend {
    sink: Arc<dyn FrameSink>,
    /// 1-based index of the configure call to accept; 0 rejects all.
    accept_at: usize,
    script: SubmitScript,
    configure_calls: Arc<AtomicUsize>,
    submitted: Arc<Mutex<Vec<EncodedChunk>>>,
    received_bytes: usize,
    emitted: bool,
}

impl ScriptedBackend {
    pub fn new(sink: Arc<dyn FrameSink>, accept_at: usize, script: SubmitScript) -> Self {
        Self {
            sink,
            accept_at,
            script,
            configure_calls: Arc::new(AtomicUsize::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
            received_bytes: 0,
            emitted: false,
        }
    }

    /// Accept the n-th offered candidate (1-based), echo frames after.
    pub fn accept_nth(n: usize, sink: Arc<dyn FrameSink>) -> Self {
        Self::new(sink, n, SubmitScript::EchoFrame)
    }

    /// Reject every candidate.
    pub fn reject_all(sink: Arc<dyn FrameSink>) -> Self {
        Self::new(sink, 0, SubmitScript::Silent)
    }

    /// Shared counter of configure attempts, for assertions.
    pub fn configure_calls(&self) -> Arc<AtomicUsize> {
        self.configure_calls.clone()
    }

    /// Shared record of every chunk submitted, for assertions.
    pub fn submitted_chunks(&self) -> Arc<Mutex<Vec<EncodedChunk>>> {
        self.submitted.clone()
    }
}

impl DecodeBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn configure(&mut self, candidate: &CodecCandidate) -> Result<(), BackendError> {
        let call = self.configure_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.accept_at {
            Ok(())
        } else {
            Err(BackendError::CodecRejected(format!(
                "scripted rejection of {candidate}"
            )))
        }
    }

    fn submit(&mut self, chunk: &EncodedChunk) -> Result<(), BackendError> {
        self.submitted.lock().push(chunk.clone());
        self.received_bytes += chunk.data.len();

        match &self.script {
            SubmitScript::EchoFrame => {
                self.sink
                    .on_frame(test_frame(chunk.pts_us, chunk.duration_us));
                Ok(())
            }
            SubmitScript::Silent => Ok(()),
            SubmitScript::FailWith(reason) => Err(BackendError::Engine(reason.clone())),
            SubmitScript::EmitAfterBytes(threshold) => {
                if !self.emitted && self.received_bytes >= *threshold {
                    self.emitted = true;
                    self.sink
                        .on_frame(test_frame(chunk.pts_us, chunk.duration_us));
                }
                Ok(())
            }
        }
    }
}
