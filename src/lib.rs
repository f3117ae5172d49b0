//! Live object detection on a webcam feed.
//!
//! A pre-trained MobileNet-SSD (Caffe) runs on every camera frame; confident
//! detections are drawn as labelled boxes together with a frames-per-second
//! counter, and the annotated frame is shown in a window until the exit key
//! is pressed.
//!
//! # Module Structure
//!
//! - `ingest`: Frame sources (OpenCV camera, synthetic)
//! - `detect`: Inference backends, SSD output parsing, class labels
//! - `display`: Output windows (OpenCV HighGUI, headless)
//! - `frame`: Frames, the `Canvas` trait and draw commands
//! - `overlay`, `palette`, `fps`: What gets drawn and in which color
//! - `driver`: The capture/infer/draw/show loop
//! - `config`, `cli`: Settings and command-line arguments
//!
//! OpenCV-backed components require the `opencv` feature.

pub mod cli;
pub mod config;
pub mod detect;
pub mod display;
pub mod driver;
pub mod fps;
pub mod frame;
pub mod ingest;
pub mod overlay;
pub mod palette;

pub use config::{BlobSettings, DetectConfig, DisplaySettings};
pub use detect::{
    class_label, Detection, InferenceBackend, NormalizedBox, ScriptedBackend, SsdOutput,
    CLASS_COUNT, CLASS_LABELS,
};
#[cfg(feature = "opencv")]
pub use detect::CaffeSsdBackend;
pub use display::{Display, HeadlessDisplay};
#[cfg(feature = "opencv")]
pub use display::HighGuiDisplay;
pub use driver::{Driver, DriverSettings, LoopState, RunSummary, StopReason};
pub use fps::FpsCounter;
pub use frame::{Canvas, Color, DrawCommand, Frame, Point};
pub use ingest::{FrameSource, SourceStats, SyntheticConfig, SyntheticSource};
#[cfg(feature = "opencv")]
pub use ingest::{CameraConfig, CameraSource};
pub use overlay::{label_origin_y, Overlay, PixelBox};
pub use palette::Palette;
