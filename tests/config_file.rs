use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use live_detect::cli::Args;
use live_detect::config::DetectConfig;

#[test]
fn loads_config_from_file() {
    let mut file = NamedTempFile::new().expect("temp config");
    let toml = r#"
        confidence = 0.55

        [camera]
        index = 2

        [display]
        width = 640
        height = 480
        window = "Detections"
        exit_key = "q"
        key_poll_ms = 5

        [blob]
        width = 512
        height = 512
        scale = 0.007843
        mean = 127.5
        swap_rb = false

        [palette]
        seed = 1234
    "#;
    file.write_all(toml.as_bytes()).expect("write config");

    let cfg = DetectConfig::load(Some(file.path())).expect("load config");

    assert_eq!(cfg.confidence, 0.55);
    assert_eq!(cfg.camera_index, 2);
    assert_eq!(cfg.display.width, 640);
    assert_eq!(cfg.display.height, 480);
    assert_eq!(cfg.display.window, "Detections");
    assert_eq!(cfg.display.exit_key, b'q');
    assert_eq!(cfg.display.key_poll.as_millis(), 5);
    assert_eq!(cfg.blob.width, 512);
    assert_eq!(cfg.blob.height, 512);
    assert_eq!(cfg.blob.scale, 0.007843);
    assert!(!cfg.blob.swap_rb);
    assert_eq!(cfg.palette_seed, Some(1234));
}

#[test]
fn command_line_threshold_overrides_file() {
    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(b"confidence = 0.55\n").expect("write config");
    let config_path = file.path().to_str().expect("utf-8 path").to_string();

    let args = Args::try_parse_from([
        "live_detect",
        "--prototxt",
        "deploy.prototxt",
        "--model",
        "mobilenet.caffemodel",
        "--confidence",
        "0.3",
        "--config",
        config_path.as_str(),
    ])
    .expect("parse args");

    let cfg = args.resolve_config().expect("resolve config");
    assert_eq!(cfg.confidence, 0.3);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.toml");
    let err = DetectConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn malformed_config_file_is_an_error() {
    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(b"confidence = \"high\"\n").expect("write config");
    let err = DetectConfig::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("invalid config file"));
}
