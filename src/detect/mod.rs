mod backend;
mod backends;
mod labels;
mod result;

pub use backend::InferenceBackend;
pub use backends::ScriptedBackend;
#[cfg(feature = "opencv")]
pub use backends::CaffeSsdBackend;
pub use labels::{class_label, CLASS_COUNT, CLASS_LABELS};
pub use result::{Detection, NormalizedBox, SsdOutput, SSD_ROW_LEN};
