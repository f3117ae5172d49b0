//! Command-line arguments for the `live_detect` binary.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::DetectConfig;
use crate::driver::DriverSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live object detection on a webcam feed with MobileNet-SSD")]
pub struct Args {
    /// Path to the Caffe 'deploy' prototxt file.
    #[arg(short, long)]
    pub prototxt: PathBuf,
    /// Path to the pre-trained Caffe model.
    #[arg(short, long)]
    pub model: PathBuf,
    /// Minimum probability to filter weak detections [default: 0.4].
    #[arg(short, long, value_parser = parse_confidence)]
    pub confidence: Option<f32>,
    /// Optional TOML file with camera, display, blob and palette settings.
    #[arg(long, env = "LIVE_DETECT_CONFIG")]
    pub config: Option<PathBuf>,
    /// Stop after this many frames (0 runs until the exit key).
    #[arg(long, default_value_t = 0)]
    pub max_frames: u64,
}

impl Args {
    /// Defaults, then the config file, then the command-line threshold.
    pub fn resolve_config(&self) -> Result<DetectConfig> {
        DetectConfig::load(self.config.as_deref())?.with_confidence(self.confidence)
    }

    pub fn driver_settings(&self, cfg: &DetectConfig) -> DriverSettings {
        DriverSettings {
            max_frames: (self.max_frames > 0).then_some(self.max_frames),
            ..DriverSettings::from(cfg)
        }
    }

    /// Fail early with a readable message when a model file is missing.
    pub fn check_model_files(&self) -> Result<()> {
        check_file("prototxt", &self.prototxt)?;
        check_file("model", &self.model)
    }
}

fn check_file(what: &str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(anyhow!("{} file {} does not exist", what, path.display()))
    }
}

fn parse_confidence(raw: &str) -> Result<f32, String> {
    let value: f32 = raw
        .parse()
        .map_err(|_| format!("{:?} is not a number", raw))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("confidence must be between 0 and 1, got {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_and_default_flags() {
        let args = Args::try_parse_from([
            "live_detect",
            "--prototxt",
            "deploy.prototxt",
            "--model",
            "mobilenet.caffemodel",
        ])
        .unwrap();
        assert_eq!(args.prototxt, PathBuf::from("deploy.prototxt"));
        assert_eq!(args.model, PathBuf::from("mobilenet.caffemodel"));
        assert_eq!(args.confidence, None);
        assert_eq!(args.max_frames, 0);

        let cfg = args.resolve_config().unwrap();
        assert_eq!(cfg.confidence, 0.4);
        assert_eq!(args.driver_settings(&cfg).max_frames, None);
    }

    #[test]
    fn short_flags_and_threshold() {
        let args = Args::try_parse_from([
            "live_detect",
            "-p",
            "a.prototxt",
            "-m",
            "b.caffemodel",
            "-c",
            "0.7",
            "--max-frames",
            "10",
        ])
        .unwrap();
        let cfg = args.resolve_config().unwrap();
        assert_eq!(cfg.confidence, 0.7);
        assert_eq!(args.driver_settings(&cfg).max_frames, Some(10));
    }

    #[test]
    fn missing_required_flags_fail() {
        assert!(Args::try_parse_from(["live_detect", "--prototxt", "a"]).is_err());
        assert!(Args::try_parse_from(["live_detect", "--model", "b"]).is_err());
    }

    #[test]
    fn out_of_range_threshold_fails() {
        assert!(Args::try_parse_from(["live_detect", "-p", "a", "-m", "b", "-c", "1.2"]).is_err());
        assert!(Args::try_parse_from(["live_detect", "-p", "a", "-m", "b", "-c", "abc"]).is_err());
    }

    #[test]
    fn missing_model_files_are_reported() {
        let args = Args::try_parse_from([
            "live_detect",
            "-p",
            "/nonexistent/deploy.prototxt",
            "-m",
            "/nonexistent/model.caffemodel",
        ])
        .unwrap();
        let err = args.check_model_files().unwrap_err();
        assert!(err.to_string().contains("prototxt"));
    }
}
