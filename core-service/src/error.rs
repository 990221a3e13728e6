use core_gallery::GalleryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),
}

impl From<core_runtime::Error> for CoreError {
    fn from(error: core_runtime::Error) -> Self {
        match error {
            core_runtime::Error::Config(msg) => CoreError::Config(msg),
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => CoreError::CapabilityMissing {
                capability,
                message,
            },
            core_runtime::Error::Internal(msg) => CoreError::InitializationFailed(msg),
        }
    }
}

impl CoreError {
    /// The underlying gallery failure, if this error came from an operation.
    pub fn as_gallery(&self) -> Option<&GalleryError> {
        match self {
            CoreError::Gallery(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
