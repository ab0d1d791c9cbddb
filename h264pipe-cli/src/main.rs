//! # h264pipe Demo Host
//!
//! Feeds the canned test bitstream through the decode pipeline, one tick
//! at a time, and logs each decoded frame. Stands in for a real render/UI
//! host: the "renderer" here just reports what it was handed.
//!
//! Usage: `h264pipe ['{"decoder":"OpenH264"}']`

use anyhow::{bail, Result};
use h264pipe_core::driver::{PipelineDriver, RenderSink, TickOutcome};
use h264pipe_core::engine::{enumerate_decoders, DecoderOptions};
use h264pipe_core::feed::FeedBudget;
use h264pipe_core::pipeline::DecodedFrame;
use h264pipe_core::test_data;
use tracing::info;

/// Ticks to attempt before declaring the stream stuck.
const MAX_TICKS: usize = 1000;

#[derive(Default)]
struct LogSink {
    presented: usize,
}

impl RenderSink for LogSink {
    fn present(&mut self, frame: &DecodedFrame) {
        self.presented += 1;
        info!(
            pts_us = frame.pts_us,
            width = frame.width,
            height = frame.height,
            format = ?frame.format,
            "decoded frame"
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!(decoders = ?enumerate_decoders(), "available decoders");

    let options = match std::env::args().nth(1) {
        Some(json) => DecoderOptions::from_json(&json)?,
        None => DecoderOptions::default(),
    };

    let mut driver = PipelineDriver::new(&options, None, FeedBudget::Bytes(4096))?;
    let bitstream = test_data::test_data("RainbowGradient.h264")?;
    driver.push_annexb(bitstream);
    info!(bytes = bitstream.len(), "bitstream queued");

    let mut sink = LogSink::default();
    for tick in 0..MAX_TICKS {
        match driver.tick(&mut sink) {
            TickOutcome::Presented => {
                info!(ticks = tick + 1, "frame presented, shutting down");
                break;
            }
            TickOutcome::Failed => {
                let err = driver
                    .failure()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                driver.shutdown();
                bail!("decode session failed: {err}");
            }
            TickOutcome::Fed(_) | TickOutcome::Idle => {}
        }
    }

    driver.shutdown();
    if sink.presented == 0 {
        bail!("no frame produced after {MAX_TICKS} ticks");
    }
    Ok(())
}
