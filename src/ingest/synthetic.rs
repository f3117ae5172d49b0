//! Synthetic frame source.
//!
//! Produces solid-color frames of a fixed size without any device. Used by
//! tests and dry runs of the detection loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};

use super::{FrameSource, SourceStats};
use crate::frame::Frame;

/// Configuration for a synthetic source.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    /// Fill color in BGR order.
    pub fill: [u8; 3],
    /// Fail after this many frames, simulating a camera that goes away.
    pub fail_after: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 360,
            fill: [32, 32, 32],
            fail_after: None,
        }
    }
}

pub struct SyntheticSource {
    config: SyntheticConfig,
    connected: bool,
    frame_count: u64,
    releases: Arc<AtomicUsize>,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            connected: false,
            frame_count: 0,
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `release` calls that actually freed the source.
    ///
    /// Stays readable after the source has been moved into (and dropped with) a driver.
    pub fn release_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }
}

impl FrameSource for SyntheticSource {
    type Frame = Frame;

    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn connect(&mut self) -> Result<()> {
        log::info!(
            "SyntheticSource: connected ({}x{})",
            self.config.width,
            self.config.height
        );
        self.connected = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        if !self.connected {
            return Err(anyhow!("synthetic source is not connected"));
        }
        if let Some(limit) = self.config.fail_after {
            if self.frame_count >= limit {
                return Err(anyhow!(
                    "synthetic source exhausted after {} frames",
                    limit
                ));
            }
        }
        self.frame_count += 1;
        Ok(Frame::filled(
            self.config.width,
            self.config.height,
            self.config.fill,
        ))
    }

    fn release(&mut self) -> Result<()> {
        if self.connected {
            self.connected = false;
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            device: "synthetic".to_string(),
        }
    }
}
