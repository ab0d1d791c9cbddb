//! # Feed Scheduler - Budgeted Bitstream Trickle
//!
//! Flooding a decode engine with an entire stream in one call stalls
//! single-threaded hosts and balloons the engine's input queue. The
//! scheduler instead owns a FIFO backlog of reformatted bytes and, on each
//! tick, hands the engine at most a fixed budget's worth — each tick stays
//! short and the engine's buffered input stays bounded.
//!
//! Backpressure is the caller's job: appends are never refused for size,
//! only paced by how often the caller appends.

use crate::engine::DecoderEngine;
use bytes::BytesMut;

/// Default per-tick byte budget.
pub const DEFAULT_TICK_BUDGET: usize = 4096;

/// How much backlog one tick may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedBudget {
    /// At most this many bytes per tick.
    Bytes(usize),
    /// Drain the whole backlog in one call.
    Unbounded,
}

impl Default for FeedBudget {
    fn default() -> Self {
        FeedBudget::Bytes(DEFAULT_TICK_BUDGET)
    }
}

/// FIFO byte backlog with a per-tick submission budget.
///
/// Bytes are appended only at the tail and removed only from the head, in
/// the order they were reformatted. Owned by exactly one producer role.
pub struct FeedScheduler {
    backlog: BytesMut,
    budget: FeedBudget,
    accepting: bool,
    bytes_submitted: u64,
}

impl FeedScheduler {
    pub fn new(budget: FeedBudget) -> Self {
        Self {
            backlog: BytesMut::new(),
            budget,
            accepting: true,
            bytes_submitted: 0,
        }
    }

    /// Append a reformatted chunk to the backlog tail. Returns `false`
    /// once the session is shutting down and the bytes were not taken.
    pub fn append(&mut self, chunk: &[u8]) -> bool {
        if !self.accepting {
            tracing::warn!(bytes = chunk.len(), "append after shutdown, dropped");
            return false;
        }
        self.backlog.extend_from_slice(chunk);
        true
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_drained(&self) -> bool {
        self.backlog.is_empty()
    }

    /// Total bytes handed to the engine so far.
    pub fn bytes_submitted(&self) -> u64 {
        self.bytes_submitted
    }

    /// Stop accepting appends (session teardown). The remaining backlog
    /// stays drainable so in-flight data is not cut off mid-chunk.
    pub fn stop(&mut self) {
        self.accepting = false;
    }

    /// Submit up to one budget's worth of backlog to the engine with the
    /// caller-supplied presentation timestamp. Returns the byte count
    /// submitted; an empty backlog returns 0 and submits nothing.
    pub fn tick(&mut self, engine: &mut DecoderEngine, pts_us: i64) -> usize {
        let n = match self.budget {
            FeedBudget::Bytes(budget) => budget.min(self.backlog.len()),
            FeedBudget::Unbounded => self.backlog.len(),
        };
        if n == 0 {
            return 0;
        }

        let slice = self.backlog.split_to(n).freeze();
        self.bytes_submitted += n as u64;
        tracing::trace!(
            bytes = n,
            pts_us,
            backlog = self.backlog.len(),
            "feed tick"
        );
        engine.submit(slice, pts_us);
        n
    }
}

impl Default for FeedScheduler {
    fn default() -> Self {
        Self::new(FeedBudget::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DecoderEngine;
    use crate::pipeline::FramePipeline;
    use crate::test_support::{ScriptedBackend, SubmitScript};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn ready_engine() -> (
        DecoderEngine,
        Arc<Mutex<Vec<crate::engine::EncodedChunk>>>,
    ) {
        let pipeline = Arc::new(FramePipeline::new());
        let backend = ScriptedBackend::new(pipeline.clone(), 1, SubmitScript::Silent);
        let chunks = backend.submitted_chunks();
        let mut engine = DecoderEngine::new(Box::new(backend), pipeline);
        engine.negotiate().unwrap();
        (engine, chunks)
    }

    #[test]
    fn test_tick_respects_budget() {
        let (mut engine, chunks) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Bytes(100));
        feed.append(&[0xAB; 250]);

        assert_eq!(feed.tick(&mut engine, 0), 100);
        assert_eq!(feed.backlog_len(), 150);
        assert_eq!(chunks.lock()[0].data.len(), 100);
    }

    #[test]
    fn test_drains_in_ceil_len_over_budget_ticks() {
        let (mut engine, _) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Bytes(100));
        feed.append(&[0x01; 250]);

        let mut ticks = 0;
        let mut pts = 0;
        while feed.tick(&mut engine, pts) > 0 {
            ticks += 1;
            pts += 16_000;
        }
        assert_eq!(ticks, 3); // ceil(250 / 100)
        assert!(feed.is_drained());
        assert_eq!(feed.bytes_submitted(), 250);
    }

    #[test]
    fn test_no_byte_submitted_twice_and_order_kept() {
        let (mut engine, chunks) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Bytes(4));
        let payload: Vec<u8> = (0..10).collect();
        feed.append(&payload);

        while feed.tick(&mut engine, 0) > 0 {}

        let seen = chunks.lock();
        let replay: Vec<u8> = seen.iter().flat_map(|c| c.data.to_vec()).collect();
        assert_eq!(replay, payload);
    }

    #[test]
    fn test_empty_backlog_tick_is_a_no_op() {
        let (mut engine, chunks) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Bytes(100));
        assert_eq!(feed.tick(&mut engine, 0), 0);
        assert!(chunks.lock().is_empty());
    }

    #[test]
    fn test_unbounded_mode_drains_in_one_tick() {
        let (mut engine, chunks) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Unbounded);
        feed.append(&[0x02; 9999]);

        assert_eq!(feed.tick(&mut engine, 0), 9999);
        assert!(feed.is_drained());
        assert_eq!(chunks.lock().len(), 1);
    }

    #[test]
    fn test_appends_refused_after_stop() {
        let (mut engine, _) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Bytes(8));
        feed.append(&[0x03; 8]);
        feed.stop();

        assert!(!feed.append(&[0x04; 8]));
        // Remaining backlog still drains.
        assert_eq!(feed.tick(&mut engine, 0), 8);
        assert!(feed.is_drained());
    }

    #[test]
    fn test_submitted_pts_is_callers() {
        let (mut engine, chunks) = ready_engine();
        let mut feed = FeedScheduler::new(FeedBudget::Bytes(2));
        feed.append(&[0x05; 4]);

        feed.tick(&mut engine, 1_000);
        feed.tick(&mut engine, 17_000);

        let seen = chunks.lock();
        assert_eq!(seen[0].pts_us, 1_000);
        assert_eq!(seen[1].pts_us, 17_000);
    }
}
