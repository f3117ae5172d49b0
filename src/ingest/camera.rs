#![cfg(feature = "opencv")]

//! OpenCV camera source.
//!
//! Opens a local capture device by index and resizes every frame to the
//! display size before handing it out.

use anyhow::{anyhow, Context, Result};
use opencv::{
    core::{Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

use super::{FrameSource, SourceStats};

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Device index (0 is the default camera).
    pub index: i32,
    /// Display width frames are resized to.
    pub width: u32,
    /// Display height frames are resized to.
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 480,
            height: 360,
        }
    }
}

pub struct CameraSource {
    config: CameraConfig,
    capture: Option<VideoCapture>,
    frame_count: u64,
}

impl CameraSource {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            capture: None,
            frame_count: 0,
        }
    }
}

impl FrameSource for CameraSource {
    type Frame = Mat;

    fn name(&self) -> &'static str {
        "camera"
    }

    fn connect(&mut self) -> Result<()> {
        let capture = VideoCapture::new(self.config.index, videoio::CAP_ANY)
            .with_context(|| format!("failed to open camera {}", self.config.index))?;
        if !capture.is_opened()? {
            return Err(anyhow!("camera {} is unavailable", self.config.index));
        }
        log::info!("CameraSource: connected to camera {}", self.config.index);
        self.capture = Some(capture);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Mat> {
        let index = self.config.index;
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| anyhow!("camera {} is not connected", index))?;

        let mut raw = Mat::default();
        let grabbed = capture
            .read(&mut raw)
            .with_context(|| format!("failed to read from camera {}", index))?;
        if !grabbed || raw.empty() {
            return Err(anyhow!("camera {} returned no frame", index));
        }

        let mut frame = Mat::default();
        imgproc::resize(
            &raw,
            &mut frame,
            Size::new(self.config.width as i32, self.config.height as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )
        .context("failed to resize camera frame")?;

        self.frame_count += 1;
        Ok(frame)
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut capture) = self.capture.take() {
            capture
                .release()
                .with_context(|| format!("failed to release camera {}", self.config.index))?;
        }
        Ok(())
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            device: format!("camera:{}", self.config.index),
        }
    }
}
