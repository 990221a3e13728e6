use bridge_traits::media::MediaStoreError;
use bridge_traits::picker::PickError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    #[error(transparent)]
    Store(#[from] MediaStoreError),

    #[error(transparent)]
    Pick(#[from] PickError),

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl GalleryError {
    /// Whether issuing the same command again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GalleryError::Store(e) => e.is_retryable(),
            GalleryError::Pick(PickError::UserCancelled) => true,
            GalleryError::Pick(_) => false,
            GalleryError::UploadInProgress => true,
            GalleryError::InvalidStateTransition { .. } => false,
        }
    }

    /// The user dismissed the picker; nothing to report.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GalleryError::Pick(PickError::UserCancelled))
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
