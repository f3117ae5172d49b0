//! The detection loop.
//!
//! `Driver` owns the frame source, the inference backend, the display and the
//! overlay state for the lifetime of a run. One iteration captures a frame,
//! runs inference, draws the confident detections plus the FPS counter, shows
//! the result and polls the keyboard.
//!
//! Lifecycle: `Running -> ShuttingDown -> Terminated`. The source and display
//! are released exactly once: at the end of `run`, whether the loop stopped
//! cleanly or failed, or on drop if `run` never completed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::config::{validate_confidence, DetectConfig};
use crate::detect::InferenceBackend;
use crate::display::Display;
use crate::fps::FpsCounter;
use crate::frame::Canvas;
use crate::ingest::FrameSource;
use crate::overlay::Overlay;
use crate::palette::Palette;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ShuttingDown,
    Terminated,
}

/// Why the loop stopped without an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The exit key was pressed.
    ExitKey,
    /// The stop signal (Ctrl-C) was raised.
    Interrupted,
    /// The configured frame limit was reached.
    FrameLimit,
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub detections_drawn: u64,
    pub elapsed: Duration,
    pub fps: f64,
    pub stop_reason: StopReason,
}

/// Loop tuning that is not owned by a collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverSettings {
    /// Detections must score strictly above this to be drawn.
    pub confidence: f32,
    pub exit_key: u8,
    pub key_poll: Duration,
    /// Stop after this many frames. `None` runs until the exit key.
    pub max_frames: Option<u64>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self::from(&DetectConfig::default())
    }
}

impl From<&DetectConfig> for DriverSettings {
    fn from(cfg: &DetectConfig) -> Self {
        Self {
            confidence: cfg.confidence,
            exit_key: cfg.display.exit_key,
            key_poll: cfg.display.key_poll,
            max_frames: None,
        }
    }
}

pub struct Driver<S, B, D>
where
    S: FrameSource,
    B: InferenceBackend<S::Frame>,
    D: Display<S::Frame>,
{
    source: S,
    backend: B,
    display: D,
    overlay: Overlay,
    settings: DriverSettings,
    stop_signal: Option<Arc<AtomicBool>>,
    state: LoopState,
    released: bool,
}

impl<S, B, D> Driver<S, B, D>
where
    S: FrameSource,
    B: InferenceBackend<S::Frame>,
    D: Display<S::Frame>,
{
    pub fn new(
        source: S,
        backend: B,
        display: D,
        palette: Palette,
        settings: DriverSettings,
    ) -> Result<Self> {
        validate_confidence(settings.confidence)?;
        Ok(Self {
            source,
            backend,
            display,
            overlay: Overlay::new(palette),
            settings,
            stop_signal: None,
            state: LoopState::Running,
            released: false,
        })
    }

    /// Stop the loop at the next iteration once `signal` becomes true.
    pub fn with_stop_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.stop_signal = Some(signal);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run the loop until a stop condition or an error, then release resources.
    ///
    /// A driver runs once; calling `run` again is an error.
    pub fn run(&mut self) -> Result<RunSummary> {
        if self.state != LoopState::Running {
            return Err(anyhow!("detection loop already ran"));
        }

        let outcome = self.run_loop();

        self.state = LoopState::ShuttingDown;
        let released = self.shutdown();
        self.state = LoopState::Terminated;

        let summary = outcome?;
        released?;

        log::info!(
            "processed {} frames ({} detections drawn) in {:.2}s, {:.2} fps, stopped by {:?}",
            summary.frames,
            summary.detections_drawn,
            summary.elapsed.as_secs_f64(),
            summary.fps,
            summary.stop_reason
        );
        Ok(summary)
    }

    /// Warm up, connect, then iterate. The summary is taken when the loop
    /// stops, before anything is released.
    fn run_loop(&mut self) -> Result<RunSummary> {
        self.backend.warm_up()?;
        self.source
            .connect()
            .with_context(|| format!("failed to connect {} source", self.source.name()))?;
        log::debug!(
            "running {} backend on {} source",
            self.backend.name(),
            self.source.name()
        );

        // the clock starts once the device is open
        let mut fps = FpsCounter::start();
        let mut drawn = 0u64;
        let stop_reason = loop {
            if self.interrupted() {
                break StopReason::Interrupted;
            }

            drawn += self.step(&mut fps)?;

            let key = self.display.poll_key(self.settings.key_poll)?;
            if key == Some(self.settings.exit_key) {
                break StopReason::ExitKey;
            }
            if let Some(limit) = self.settings.max_frames {
                if fps.frames() >= limit {
                    break StopReason::FrameLimit;
                }
            }
        };

        Ok(RunSummary {
            frames: fps.frames(),
            detections_drawn: drawn,
            elapsed: fps.elapsed(),
            fps: fps.current(),
            stop_reason,
        })
    }

    /// One iteration: capture, infer, annotate, show. Returns detections drawn.
    fn step(&mut self, fps: &mut FpsCounter) -> Result<u64> {
        let mut frame = self.source.next_frame()?;
        let output = self.backend.forward(&frame)?;
        let detections = output.detections_above(self.settings.confidence);
        log::debug!(
            "{} of {} candidates above {}",
            detections.len(),
            output.len(),
            self.settings.confidence
        );

        let (width, height) = (frame.width(), frame.height());
        for command in self.overlay.plan(&detections, width, height) {
            frame.draw(&command)?;
        }

        let rate = fps.tick();
        frame.draw(&self.overlay.fps(rate))?;

        self.display.show(&frame)?;
        Ok(detections.len() as u64)
    }

    fn interrupted(&self) -> bool {
        self.stop_signal
            .as_ref()
            .is_some_and(|signal| signal.load(Ordering::SeqCst))
    }

    /// Release the source and close the display. Runs its body at most once.
    fn shutdown(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        log::info!("release video stream...");
        let source = self.source.release();
        let display = self.display.close();
        source.and(display)
    }
}

impl<S, B, D> Drop for Driver<S, B, D>
where
    S: FrameSource,
    B: InferenceBackend<S::Frame>,
    D: Display<S::Frame>,
{
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            log::warn!("failed to release resources on drop: {:#}", err);
        }
    }
}
