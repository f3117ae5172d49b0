#![cfg(feature = "opencv")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use opencv::{
    core::{self, Mat, Scalar, Size},
    dnn, imgproc,
    prelude::*,
};

use crate::config::BlobSettings;
use crate::detect::backend::InferenceBackend;
use crate::detect::result::SsdOutput;

/// OpenCV DNN backend for Caffe SSD models.
///
/// Loads a `deploy.prototxt` topology and `.caffemodel` weights once, then
/// runs `blobFromImage` + `forward` for every frame.
pub struct CaffeSsdBackend {
    net: dnn::Net,
    blob: BlobSettings,
}

impl CaffeSsdBackend {
    /// Load the network from disk.
    pub fn load<P: AsRef<Path>, M: AsRef<Path>>(
        prototxt: P,
        model: M,
        blob: BlobSettings,
    ) -> Result<Self> {
        let prototxt = path_str(prototxt.as_ref())?;
        let model = path_str(model.as_ref())?;
        let net = dnn::read_net_from_caffe(prototxt, model)
            .with_context(|| format!("failed to load Caffe model {} / {}", prototxt, model))?;
        if net.empty()? {
            return Err(anyhow!("Caffe model {} / {} has no layers", prototxt, model));
        }
        Ok(Self { net, blob })
    }

    fn build_blob(&self, frame: &Mat) -> Result<Mat> {
        let size = Size::new(self.blob.width as i32, self.blob.height as i32);
        let mut resized = Mat::default();
        imgproc::resize(frame, &mut resized, size, 0.0, 0.0, imgproc::INTER_LINEAR)
            .context("failed to resize frame to network input")?;
        let blob = dnn::blob_from_image(
            &resized,
            self.blob.scale,
            size,
            Scalar::all(self.blob.mean),
            self.blob.swap_rb,
            false,
            core::CV_32F,
        )
        .context("failed to build input blob")?;
        Ok(blob)
    }
}

impl InferenceBackend<Mat> for CaffeSsdBackend {
    fn name(&self) -> &'static str {
        "caffe-ssd"
    }

    fn forward(&mut self, frame: &Mat) -> Result<SsdOutput> {
        let blob = self.build_blob(frame)?;
        self.net
            .set_input(&blob, "", 1.0, Scalar::default())
            .context("failed to set network input")?;
        let output = self
            .net
            .forward_single("")
            .context("SSD forward pass failed")?;
        let values = output
            .data_typed::<f32>()
            .context("detection tensor was not f32")?
            .to_vec();
        SsdOutput::from_raw(values)
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow!("model path {} is not valid UTF-8", path.display()))
}
