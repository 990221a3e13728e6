//! Media Picker Abstraction
//!
//! The on-device picker UI is owned by the host. The core only sees the
//! outcome: a local URI, a cancellation, or a permission denial.

use async_trait::async_trait;
use thiserror::Error;

/// Reasons a pick produced no media.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// The user dismissed the picker. Not an error to surface to the user.
    #[error("Pick cancelled by user")]
    UserCancelled,

    /// The host refused access to the media library.
    #[error("Permission to access gallery is required!")]
    PermissionDenied,

    /// The picker could not be shown at all.
    #[error("Picker unavailable: {0}")]
    Unavailable(String),
}

impl PickError {
    /// Whether this outcome should be shown to the end user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, PickError::UserCancelled)
    }
}

/// Image picker capability
///
/// Implementations present whatever native UI the platform offers and return
/// a local URI (a plain path or a `file://` URI) for the chosen image.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::picker::{MediaPicker, PickError};
///
/// async fn choose(picker: &dyn MediaPicker) -> Option<String> {
///     match picker.pick_image().await {
///         Ok(uri) => Some(uri),
///         Err(PickError::UserCancelled) => None,
///         Err(e) => {
///             eprintln!("{}", e);
///             None
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait MediaPicker: Send + Sync {
    /// Ask the user for one image.
    async fn pick_image(&self) -> std::result::Result<String, PickError>;
}
