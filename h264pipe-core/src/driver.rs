//! # Pipeline Driver - Cooperative Tick Loop
//!
//! One invocation per host frame: poll the frame pipeline; if a frame is
//! ready hand it to the render collaborator and return, otherwise feed the
//! decoder one budget's worth of backlog and return. The driver never
//! blocks — a frame produced between ticks is discovered on the next one.
//!
//! The driver also owns the session plumbing around the tick: reformatting
//! container samples into the backlog (with one-time parameter-set priming
//! on the first sample) and teardown.

use crate::annexb::{self, ParameterSets, ReformatError};
use crate::engine::{create_decoder, DecoderEngine, DecoderOptions, EngineError};
use crate::feed::{FeedBudget, FeedScheduler};
use crate::pipeline::{DecodedFrame, FramePipeline, PipelineError, PipelineItem};
use std::sync::Arc;

/// Render collaborator boundary: one call per decoded frame. The sink owns
/// whatever textures or surfaces it uploads into.
pub trait RenderSink {
    fn present(&mut self, frame: &DecodedFrame);
}

/// What one driver tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A decoded frame was handed to the render sink.
    Presented,
    /// No frame ready; this many encoded bytes were fed to the engine
    /// (0 when the backlog is empty).
    Fed(usize),
    /// The pipeline surfaced a terminal error; see [`PipelineDriver::failure`].
    Failed,
    /// The session is shut down or already failed.
    Idle,
}

/// Per-session control loop over scheduler, engine and frame pipeline.
pub struct PipelineDriver {
    params: Option<ParameterSets>,
    scheduler: FeedScheduler,
    engine: Option<DecoderEngine>,
    pipeline: Arc<FramePipeline>,
    primed: bool,
    next_pts_us: i64,
    flushed: bool,
    failure: Option<PipelineError>,
}

impl PipelineDriver {
    /// Build a full session: create the requested decoder, negotiate a
    /// codec, and wire the frame pipeline. `params` are required when the
    /// session will be fed container samples; raw Annex B input carries
    /// its own parameter sets.
    pub fn new(
        options: &DecoderOptions,
        params: Option<ParameterSets>,
        budget: FeedBudget,
    ) -> Result<Self, EngineError> {
        let pipeline = Arc::new(FramePipeline::new());
        let mut engine = create_decoder(options, pipeline.clone())?;
        engine.negotiate()?;
        Ok(Self::with_engine(engine, pipeline, params, budget))
    }

    /// Assemble a session around an already-negotiated engine. The
    /// `pipeline` must be the sink the engine produces into.
    pub fn with_engine(
        engine: DecoderEngine,
        pipeline: Arc<FramePipeline>,
        params: Option<ParameterSets>,
        budget: FeedBudget,
    ) -> Self {
        Self {
            params,
            scheduler: FeedScheduler::new(budget),
            engine: Some(engine),
            pipeline,
            primed: false,
            next_pts_us: 0,
            flushed: false,
            failure: None,
        }
    }

    pub fn pipeline(&self) -> Arc<FramePipeline> {
        self.pipeline.clone()
    }

    /// The terminal error, once a tick has observed one.
    pub fn failure(&self) -> Option<&PipelineError> {
        self.failure.as_ref()
    }

    pub fn backlog_len(&self) -> usize {
        self.scheduler.backlog_len()
    }

    /// Reformat one length-prefixed container sample into the backlog.
    ///
    /// The first sample of the session is preceded by the parameter-set
    /// priming chunk (PPS, then SPS). A malformed sample is dropped whole
    /// — nothing is appended, priming does not happen, and the session
    /// carries on with the next sample.
    pub fn push_sample(&mut self, sample: &[u8]) -> Result<(), ReformatError> {
        let chunk = annexb::avcc_to_annexb(sample)?;
        if !self.primed {
            if let Some(params) = &self.params {
                let primer = params.prime();
                self.scheduler.append(&primer);
            }
            self.primed = true;
        }
        self.scheduler.append(&chunk);
        self.flushed = false;
        Ok(())
    }

    /// Append bytes that are already start-code delimited (for example the
    /// canned test bitstreams, which carry their own parameter sets).
    pub fn push_annexb(&mut self, chunk: &[u8]) {
        self.scheduler.append(chunk);
        self.flushed = false;
    }

    /// One cooperative tick; never blocks.
    pub fn tick(&mut self, out: &mut dyn RenderSink) -> TickOutcome {
        if self.failure.is_some() {
            return TickOutcome::Idle;
        }
        let Some(engine) = self.engine.as_mut() else {
            return TickOutcome::Idle;
        };

        match self.pipeline.try_take_ready() {
            Some(PipelineItem::Frame(frame)) => {
                tracing::debug!(pts_us = frame.pts_us, "presenting frame");
                out.present(&frame);
                TickOutcome::Presented
            }
            Some(PipelineItem::Error(err)) => {
                tracing::error!(error = %err, "decode session failed");
                self.failure = Some(err);
                TickOutcome::Failed
            }
            None => {
                let pts_us = self.next_pts_us;
                let fed = self.scheduler.tick(engine, pts_us);
                if fed > 0 {
                    self.next_pts_us += engine.chunk_duration_us();
                } else if self.scheduler.bytes_submitted() > 0 && !self.flushed {
                    // Backlog drained: tell the engine no more bytes follow
                    // so any input it is still holding gets decoded.
                    tracing::debug!("backlog drained, flushing engine");
                    engine.flush();
                    self.flushed = true;
                }
                TickOutcome::Fed(fed)
            }
        }
    }

    /// Tear the session down: stop accepting appends, release the decode
    /// engine, and resolve any outstanding wait with a cancellation.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.engine = None;
        self.pipeline.close();
    }
}

// ============================================================================
// Tests
// ============================================================================
