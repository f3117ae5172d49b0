//! Frame ingestion sources.
//!
//! This module provides different sources for frames:
//! - Local camera devices through OpenCV (feature: opencv)
//! - Synthetic source (testing)
//!
//! Every source hands out frames already resized to the display size. A source
//! is connected once before the loop starts and released once after it ends.

#[cfg(feature = "opencv")]
pub mod camera;
pub mod synthetic;

#[cfg(feature = "opencv")]
pub use camera::{CameraConfig, CameraSource};
pub use synthetic::{SyntheticConfig, SyntheticSource};

use anyhow::Result;

use crate::frame::Canvas;

/// A capture device producing display-sized frames.
pub trait FrameSource {
    type Frame: Canvas;

    /// Source identifier.
    fn name(&self) -> &'static str;

    /// Open the device.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame. Failure is fatal to the caller; sources do not retry.
    fn next_frame(&mut self) -> Result<Self::Frame>;

    /// Release the device. Safe to call on a source that never connected.
    fn release(&mut self) -> Result<()>;

    fn stats(&self) -> SourceStats;
}

/// Statistics for a frame source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub device: String,
}
