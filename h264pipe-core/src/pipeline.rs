//! # Frame Pipeline - Callback to Pull Bridge
//!
//! The decode engine's callback runs on whatever context the platform
//! supplies; consumers live on the tick loop. This module bridges the two:
//! the callback side pushes frames or errors, the consumer side either
//! polls (`try_take_ready`) or suspends (`wait_for_next`) until the next
//! item arrives. Items come out in the exact order they went in.
//!
//! Each `wait_for_next` maps to exactly one production event, like a
//! single-assignment future. At most one wait may be outstanding at a
//! time; an error resolves exactly one pending or future wait, after which
//! the session is considered unusable until rebuilt.

use parking_lot::Mutex;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::oneshot;

// ============================================================================
// Frames
// ============================================================================

/// Pixel layout of a decoded frame's data buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4:2:0 planar, Y then U then V, no row padding.
    I420,
    /// 4:2:0 semi-planar, Y plane then interleaved UV.
    Nv12,
}

/// A decoded video frame. The presentation timestamp is the one supplied
/// at submission, passed through unchanged.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub data: bytes::Bytes,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub pts_us: i64,
    pub duration_us: i64,
}

// ============================================================================
// Errors
// ============================================================================

/// Failures delivered through the pipeline's error channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The engine rejected one submitted chunk. Later chunks may still
    /// decode; continuing is the caller's call.
    #[error("decoder rejected chunk at pts {pts_us}: {reason}")]
    Submission { pts_us: i64, reason: String },
    /// Asynchronous failure from the decode engine itself. Terminal for
    /// the session; no implicit retry.
    #[error("decode failed: {0}")]
    Decode(String),
    /// The session was torn down while a wait was outstanding.
    #[error("decode session cancelled")]
    Cancelled,
    /// A second wait was issued before the first resolved.
    #[error("a wait is already outstanding")]
    AlreadyWaiting,
}

/// One item flowing through the pipeline.
#[derive(Debug)]
pub enum PipelineItem {
    Frame(DecodedFrame),
    Error(PipelineError),
}

impl PipelineItem {
    pub fn into_result(self) -> Result<DecodedFrame, PipelineError> {
        match self {
            PipelineItem::Frame(frame) => Ok(frame),
            PipelineItem::Error(err) => Err(err),
        }
    }
}

// ============================================================================
// Producer Seam
// ============================================================================

/// Producer half of the pipeline, handed to decode backends as their
/// frame/error callback surface.
pub trait FrameSink: Send + Sync {
    fn on_frame(&self, frame: DecodedFrame);
    fn on_error(&self, error: PipelineError);
}

// ============================================================================
// Frame Pipeline
// ============================================================================

struct Inner {
    ready: VecDeque<PipelineItem>,
    waiter: Option<oneshot::Sender<PipelineItem>>,
    closed: bool,
}

/// Single-producer, single-waiter frame queue.
///
/// The producer (engine callback context) and consumer (tick context) may
/// run concurrently; the handoff is a mutex-guarded slot plus a oneshot
/// wakeup, so an item pushed from any context resolves the outstanding
/// wait. Invariant: a waiter is only registered while `ready` is empty.
pub struct FramePipeline {
    inner: Mutex<Inner>,
}

impl FramePipeline {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                ready: VecDeque::new(),
                waiter: None,
                closed: false,
            }),
        }
    }

    fn push(&self, item: PipelineItem) {
        let mut inner = self.inner.lock();
        if inner.closed {
            tracing::debug!("pipeline closed, dropping item");
            return;
        }
        if let Some(waiter) = inner.waiter.take() {
            // A send can only fail if the waiting task was dropped; the
            // item is then queued for the next consumer instead.
            if let Err(item) = waiter.send(item) {
                inner.ready.push_back(item);
            }
        } else {
            inner.ready.push_back(item);
        }
    }

    /// Producer side: a decoded frame arrived.
    pub fn push_frame(&self, frame: DecodedFrame) {
        self.push(PipelineItem::Frame(frame));
    }

    /// Producer side: the engine failed. Resolves exactly one pending or
    /// future wait.
    pub fn push_error(&self, error: PipelineError) {
        self.push(PipelineItem::Error(error));
    }

    /// Non-blocking poll for the next item. Used by the tick-loop driver,
    /// which never blocks.
    pub fn try_take_ready(&self) -> Option<PipelineItem> {
        self.inner.lock().ready.pop_front()
    }

    /// Suspend until the next frame or error is produced.
    ///
    /// Issuing a second wait while one is outstanding is a usage error and
    /// fails with [`PipelineError::AlreadyWaiting`] without disturbing the
    /// first waiter.
    pub async fn wait_for_next(&self) -> Result<DecodedFrame, PipelineError> {
        let rx = {
            let mut inner = self.inner.lock();
            if let Some(item) = inner.ready.pop_front() {
                return item.into_result();
            }
            if inner.closed {
                return Err(PipelineError::Cancelled);
            }
            if inner.waiter.is_some() {
                return Err(PipelineError::AlreadyWaiting);
            }
            let (tx, rx) = oneshot::channel();
            inner.waiter = Some(tx);
            rx
        };

        match rx.await {
            Ok(item) => item.into_result(),
            Err(_) => Err(PipelineError::Cancelled),
        }
    }

    /// Tear down: rejects further pushes and resolves any outstanding wait
    /// with [`PipelineError::Cancelled`].
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        if let Some(waiter) = inner.waiter.take() {
            let _ = waiter.send(PipelineItem::Error(PipelineError::Cancelled));
        }
    }

    /// Number of produced-but-unconsumed items.
    pub fn ready_len(&self) -> usize {
        self.inner.lock().ready.len()
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for FramePipeline {
    fn on_frame(&self, frame: DecodedFrame) {
        self.push_frame(frame);
    }

    fn on_error(&self, error: PipelineError) {
        self.push_error(error);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn frame(pts_us: i64) -> DecodedFrame {
        DecodedFrame {
            data: bytes::Bytes::from_static(&[0u8; 16]),
            format: PixelFormat::I420,
            width: 4,
            height: 2,
            pts_us,
            duration_us: 16_000,
        }
    }

    #[tokio::test]
    async fn test_push_then_wait_resolves_that_frame() {
        let pipeline = FramePipeline::new();
        pipeline.push_frame(frame(42));
        let got = pipeline.wait_for_next().await.unwrap();
        assert_eq!(got.pts_us, 42);
    }

    #[tokio::test]
    async fn test_error_resolves_wait() {
        let pipeline = FramePipeline::new();
        pipeline.push_error(PipelineError::Decode("engine blew up".into()));
        let err = pipeline.wait_for_next().await.unwrap_err();
        assert_eq!(err, PipelineError::Decode("engine blew up".into()));
    }

    #[tokio::test]
    async fn test_two_pushes_two_waits_in_order() {
        let pipeline = FramePipeline::new();
        pipeline.push_frame(frame(1));
        pipeline.push_frame(frame(2));
        assert_eq!(pipeline.wait_for_next().await.unwrap().pts_us, 1);
        assert_eq!(pipeline.wait_for_next().await.unwrap().pts_us, 2);
    }

    #[tokio::test]
    async fn test_wait_suspends_until_push_from_other_context() {
        let pipeline = Arc::new(FramePipeline::new());
        let producer = pipeline.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            producer.push_frame(frame(7));
        });
        let got = pipeline.wait_for_next().await.unwrap();
        assert_eq!(got.pts_us, 7);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_try_take_ready_is_non_blocking() {
        let pipeline = FramePipeline::new();
        assert!(pipeline.try_take_ready().is_none());
        pipeline.push_frame(frame(3));
        match pipeline.try_take_ready() {
            Some(PipelineItem::Frame(f)) => assert_eq!(f.pts_us, 3),
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_concurrent_wait_is_usage_error() {
        let pipeline = Arc::new(FramePipeline::new());
        let first = pipeline.clone();
        let outstanding = tokio::spawn(async move { first.wait_for_next().await });
        // Give the first wait time to register.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let err = pipeline.wait_for_next().await.unwrap_err();
        assert_eq!(err, PipelineError::AlreadyWaiting);

        // The first waiter is untouched and still resolves.
        pipeline.push_frame(frame(9));
        assert_eq!(outstanding.await.unwrap().unwrap().pts_us, 9);
    }

    #[tokio::test]
    async fn test_close_cancels_outstanding_wait() {
        let pipeline = Arc::new(FramePipeline::new());
        let waiter = pipeline.clone();
        let outstanding = tokio::spawn(async move { waiter.wait_for_next().await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        pipeline.close();
        assert_eq!(
            outstanding.await.unwrap().unwrap_err(),
            PipelineError::Cancelled
        );

        // Closed pipeline refuses new items and fails fresh waits.
        pipeline.push_frame(frame(1));
        assert_eq!(
            pipeline.wait_for_next().await.unwrap_err(),
            PipelineError::Cancelled
        );
    }
}
