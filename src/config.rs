use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIDENCE: f32 = 0.4;
const DEFAULT_CAMERA_INDEX: i32 = 0;
const DEFAULT_DISPLAY_WIDTH: u32 = 480;
const DEFAULT_DISPLAY_HEIGHT: u32 = 360;
const DEFAULT_WINDOW: &str = "Frame";
const DEFAULT_EXIT_KEY: u8 = b' ';
const DEFAULT_KEY_POLL_MS: u64 = 1;
const DEFAULT_BLOB_SIZE: u32 = 300;
const DEFAULT_BLOB_SCALE: f64 = 0.0075;
const DEFAULT_BLOB_MEAN: f64 = 127.5;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DetectConfigFile {
    confidence: Option<f32>,
    camera: Option<CameraConfigFile>,
    display: Option<DisplayConfigFile>,
    blob: Option<BlobConfigFile>,
    palette: Option<PaletteConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CameraConfigFile {
    index: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DisplayConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    window: Option<String>,
    exit_key: Option<String>,
    key_poll_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct BlobConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    scale: Option<f64>,
    mean: Option<f64>,
    swap_rb: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PaletteConfigFile {
    seed: Option<u64>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectConfig {
    /// Minimum confidence (exclusive) for a detection to be drawn.
    pub confidence: f32,
    pub camera_index: i32,
    pub display: DisplaySettings,
    pub blob: BlobSettings,
    /// Seed for the class color table. `None` draws fresh colors every run.
    pub palette_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub width: u32,
    pub height: u32,
    pub window: String,
    pub exit_key: u8,
    pub key_poll: Duration,
}

/// Parameters for turning a frame into network input.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobSettings {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub mean: f64,
    pub swap_rb: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            camera_index: DEFAULT_CAMERA_INDEX,
            display: DisplaySettings::default(),
            blob: BlobSettings::default(),
            palette_seed: None,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
            window: DEFAULT_WINDOW.to_string(),
            exit_key: DEFAULT_EXIT_KEY,
            key_poll: Duration::from_millis(DEFAULT_KEY_POLL_MS),
        }
    }
}

impl Default for BlobSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_BLOB_SIZE,
            height: DEFAULT_BLOB_SIZE,
            scale: DEFAULT_BLOB_SCALE,
            mean: DEFAULT_BLOB_MEAN,
            swap_rb: true,
        }
    }
}

impl DetectConfig {
    /// Defaults, overlaid with the TOML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => DetectConfigFile::default(),
        };
        let cfg = Self::from_file(file_cfg)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file_cfg: DetectConfigFile =
            toml::from_str(raw).map_err(|e| anyhow!("invalid config: {}", e))?;
        let cfg = Self::from_file(file_cfg)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: DetectConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let camera = file.camera.unwrap_or_default();
        let display = file.display.unwrap_or_default();
        let blob = file.blob.unwrap_or_default();
        let exit_key = match display.exit_key.as_deref() {
            Some(key) => parse_exit_key(key)?,
            None => defaults.display.exit_key,
        };
        Ok(Self {
            confidence: file.confidence.unwrap_or(defaults.confidence),
            camera_index: camera.index.unwrap_or(defaults.camera_index),
            display: DisplaySettings {
                width: display.width.unwrap_or(defaults.display.width),
                height: display.height.unwrap_or(defaults.display.height),
                window: display.window.unwrap_or(defaults.display.window),
                exit_key,
                key_poll: display
                    .key_poll_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.display.key_poll),
            },
            blob: BlobSettings {
                width: blob.width.unwrap_or(defaults.blob.width),
                height: blob.height.unwrap_or(defaults.blob.height),
                scale: blob.scale.unwrap_or(defaults.blob.scale),
                mean: blob.mean.unwrap_or(defaults.blob.mean),
                swap_rb: blob.swap_rb.unwrap_or(defaults.blob.swap_rb),
            },
            palette_seed: file.palette.and_then(|palette| palette.seed),
        })
    }

    /// Override the confidence threshold, e.g. from the command line.
    pub fn with_confidence(mut self, confidence: Option<f32>) -> Result<Self> {
        if let Some(confidence) = confidence {
            self.confidence = confidence;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        validate_confidence(self.confidence)?;
        if self.display.width == 0 || self.display.height == 0 {
            return Err(anyhow!("display size must be non-zero"));
        }
        if self.blob.width == 0 || self.blob.height == 0 {
            return Err(anyhow!("blob size must be non-zero"));
        }
        if !(self.blob.scale.is_finite() && self.blob.scale > 0.0) {
            return Err(anyhow!("blob scale must be a positive number"));
        }
        if !self.blob.mean.is_finite() {
            return Err(anyhow!("blob mean must be finite"));
        }
        if self.display.window.trim().is_empty() {
            return Err(anyhow!("window name must not be empty"));
        }
        if self.camera_index < 0 {
            return Err(anyhow!("camera index must be >= 0"));
        }
        Ok(())
    }
}

/// Confidence thresholds live in `[0, 1]`.
pub fn validate_confidence(confidence: f32) -> Result<()> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(anyhow!(
            "confidence must be between 0 and 1, got {}",
            confidence
        ))
    }
}

fn parse_exit_key(key: &str) -> Result<u8> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(anyhow!(
            "exit_key must be a single ASCII character, got {:?}",
            key
        )),
    }
}

fn read_config_file(path: &Path) -> Result<DetectConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
