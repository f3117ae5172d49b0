//! live_detect - webcam object detection with a MobileNet-SSD Caffe model
//!
//! 1. Loads the network from `--prototxt` / `--model`
//! 2. Opens the default camera
//! 3. Draws detections above `--confidence` and an FPS counter on every frame
//! 4. Shows the result until space is pressed (or Ctrl-C)

use anyhow::Result;
use clap::Parser;

use live_detect::cli::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = args.resolve_config()?;
    args.check_model_files()?;

    run(&args, &cfg)
}

#[cfg(feature = "opencv")]
fn run(args: &Args, cfg: &live_detect::DetectConfig) -> Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use anyhow::Context;
    use live_detect::{
        CaffeSsdBackend, CameraConfig, CameraSource, Driver, HighGuiDisplay, Palette,
    };

    log::info!("loading model...");
    let backend = CaffeSsdBackend::load(&args.prototxt, &args.model, cfg.blob.clone())?;
    log::info!("successful in loading model");

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::SeqCst);
    })
    .context("error setting Ctrl-C handler")?;

    log::info!("starting video stream...");
    let source = CameraSource::new(CameraConfig {
        index: cfg.camera_index,
        width: cfg.display.width,
        height: cfg.display.height,
    });
    let display = HighGuiDisplay::new(cfg.display.window.clone());
    let palette = Palette::from_seed(cfg.palette_seed);

    let mut driver = Driver::new(source, backend, display, palette, args.driver_settings(cfg))?
        .with_stop_signal(stop);
    driver.run()?;
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn run(_args: &Args, _cfg: &live_detect::DetectConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "live_detect was built without camera support; rebuild with `--features opencv`"
    ))
}
