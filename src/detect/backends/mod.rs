pub mod scripted;

#[cfg(feature = "opencv")]
pub mod caffe;

pub use scripted::ScriptedBackend;

#[cfg(feature = "opencv")]
pub use caffe::CaffeSsdBackend;
