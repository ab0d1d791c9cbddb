//! # h264pipe Core
//!
//! Integration pipeline turning length-prefixed H.264 container samples
//! into an ordered stream of decoded frames:
//! - AVCC to Annex B reformatting with parameter-set priming
//! - Budgeted, resumable feeding of encoded bytes into a decode engine
//! - Ranked-candidate codec negotiation with aggregated failure reporting
//! - Callback-to-pull frame pipeline preserving order and errors
//! - A non-blocking per-tick driver for hosts with a fixed time budget
//!
//! Container box parsing and rendering live in collaborators; see
//! [`track`] for the hand-over types and [`driver::RenderSink`] for the
//! presentation seam.

// ============================================================================
// Bitstream
// ============================================================================
pub mod annexb;
pub mod track;

// ============================================================================
// Decode Engine
// ============================================================================
pub mod codec;
pub mod engine;
#[cfg(feature = "software-decode")]
pub mod openh264_backend;

// ============================================================================
// Frame Delivery
// ============================================================================
pub mod feed;
pub mod pipeline;
pub mod driver;

// ============================================================================
// Test Aids
// ============================================================================
pub mod test_data;
pub mod test_support;

// ============================================================================
// Version
// ============================================================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
