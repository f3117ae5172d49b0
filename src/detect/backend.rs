use anyhow::Result;

use crate::detect::result::SsdOutput;

/// Inference backend trait.
///
/// A backend owns a loaded classifier and turns one display-sized frame into
/// the raw SSD detection tensor. Blob preparation (resize, scale, mean
/// subtraction, channel swap) happens inside the backend. Thresholding and
/// class lookup are left to the caller.
pub trait InferenceBackend<F: ?Sized> {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run one forward pass on a frame.
    fn forward(&mut self, frame: &F) -> Result<SsdOutput>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
