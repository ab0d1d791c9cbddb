//! End-to-end decode session: canned bitstream in, one decoded frame out,
//! driven entirely by the cooperative tick loop with a 4096-byte budget.

use h264pipe_core::driver::{PipelineDriver, RenderSink, TickOutcome};
use h264pipe_core::engine::DecoderEngine;
use h264pipe_core::feed::FeedBudget;
use h264pipe_core::pipeline::{DecodedFrame, FramePipeline};
use h264pipe_core::test_data::test_data;
use h264pipe_core::test_support::{ScriptedBackend, SubmitScript};
use std::sync::Arc;

#[derive(Default)]
struct CollectingSink {
    frames: Vec<DecodedFrame>,
}

impl RenderSink for CollectingSink {
    fn present(&mut self, frame: &DecodedFrame) {
        self.frames.push(frame.clone());
    }
}

fn run_until_quiet(driver: &mut PipelineDriver, sink: &mut CollectingSink) {
    let mut idle_ticks = 0;
    for _ in 0..1000 {
        match driver.tick(sink) {
            TickOutcome::Fed(0) | TickOutcome::Idle => idle_ticks += 1,
            _ => idle_ticks = 0,
        }
        if idle_ticks >= 5 {
            break;
        }
    }
}

#[test]
fn test_fixture_yields_exactly_one_frame_with_submission_pts() {
    let bitstream = test_data("RainbowGradient.h264").unwrap();

    let pipeline = Arc::new(FramePipeline::new());
    // Engine that produces its single picture once the whole bitstream
    // has arrived, stamped with the triggering submission's timestamp.
    let backend = ScriptedBackend::new(
        pipeline.clone(),
        1,
        SubmitScript::EmitAfterBytes(bitstream.len()),
    );
    let chunks = backend.submitted_chunks();
    let mut engine = DecoderEngine::new(Box::new(backend), pipeline.clone());
    engine.negotiate().unwrap();

    let mut driver =
        PipelineDriver::with_engine(engine, pipeline, None, FeedBudget::Bytes(4096));
    driver.push_annexb(bitstream);

    let mut sink = CollectingSink::default();
    run_until_quiet(&mut driver, &mut sink);

    assert_eq!(sink.frames.len(), 1);
    let triggering_pts = chunks.lock().last().unwrap().pts_us;
    assert_eq!(sink.frames[0].pts_us, triggering_pts);

    driver.shutdown();
}

#[test]
fn test_small_budget_needs_multiple_feed_ticks() {
    let bitstream = test_data("RainbowGradient.h264").unwrap();

    let pipeline = Arc::new(FramePipeline::new());
    let backend = ScriptedBackend::new(
        pipeline.clone(),
        1,
        SubmitScript::EmitAfterBytes(bitstream.len()),
    );
    let chunks = backend.submitted_chunks();
    let mut engine = DecoderEngine::new(Box::new(backend), pipeline.clone());
    engine.negotiate().unwrap();

    let budget = 256;
    let mut driver =
        PipelineDriver::with_engine(engine, pipeline, None, FeedBudget::Bytes(budget));
    driver.push_annexb(bitstream);

    let mut sink = CollectingSink::default();
    run_until_quiet(&mut driver, &mut sink);

    assert_eq!(sink.frames.len(), 1);
    let seen = chunks.lock();
    assert_eq!(seen.len(), bitstream.len().div_ceil(budget));
    assert!(seen.iter().all(|c| c.data.len() <= budget));
    // Replaying the chunks reconstructs the stream byte for byte.
    let replay: Vec<u8> = seen.iter().flat_map(|c| c.data.to_vec()).collect();
    assert_eq!(replay, bitstream);
}

#[cfg(feature = "software-decode")]
#[test]
fn test_openh264_decodes_the_fixture_for_real() {
    use h264pipe_core::engine::DecoderOptions;

    let bitstream = test_data("RainbowGradient.h264").unwrap();
    let mut driver = PipelineDriver::new(
        &DecoderOptions::default(),
        None,
        FeedBudget::Bytes(4096),
    )
    .unwrap();
    driver.push_annexb(bitstream);

    let mut sink = CollectingSink::default();
    run_until_quiet(&mut driver, &mut sink);

    assert_eq!(sink.frames.len(), 1);
    let frame = &sink.frames[0];
    // The SPS encodes 6x16 macroblocks with no cropping: 96x256.
    assert_eq!((frame.width, frame.height), (96, 256));
    // Fixture fits one budget, so the whole stream rode the first
    // submission at pts 0 — and the pts passes through unchanged.
    assert_eq!(frame.pts_us, 0);
    assert_eq!(
        frame.data.len(),
        (frame.width * frame.height * 3 / 2) as usize
    );

    driver.shutdown();
}
