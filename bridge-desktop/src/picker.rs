//! Media Picker Implementations for Desktop

use async_trait::async_trait;
use bridge_traits::picker::{MediaPicker, PickError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Picker fed by the host with a path chosen outside the core
/// (a CLI argument, a drag-and-drop target, a test fixture).
///
/// Each call to [`pick_image`](MediaPicker::pick_image) consumes the queued
/// path. With nothing queued the pick counts as cancelled.
#[derive(Debug, Default)]
pub struct PathPicker {
    next: Mutex<Option<PathBuf>>,
}

impl PathPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picker with a path already queued.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            next: Mutex::new(Some(path.into())),
        }
    }

    /// Queue the path returned by the next pick, replacing any queued one.
    pub fn queue(&self, path: impl Into<PathBuf>) {
        if let Ok(mut next) = self.next.lock() {
            *next = Some(path.into());
        }
    }
}

#[async_trait]
impl MediaPicker for PathPicker {
    async fn pick_image(&self) -> Result<String, PickError> {
        let path = self
            .next
            .lock()
            .map_err(|_| PickError::Unavailable("picker state poisoned".to_string()))?
            .take()
            .ok_or(PickError::UserCancelled)?;

        // Opening the file is the desktop equivalent of a permission prompt.
        match tokio::fs::File::open(&path).await {
            Ok(_) => {
                debug!("Picked local file");
                Ok(path.to_string_lossy().into_owned())
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(PickError::PermissionDenied),
            Err(e) => Err(PickError::Unavailable(e.to_string())),
        }
    }
}

/// Native file dialog picker backed by `rfd`.
#[cfg(feature = "dialog")]
#[derive(Debug, Clone)]
pub struct DialogPicker {
    title: String,
}

#[cfg(feature = "dialog")]
impl Default for DialogPicker {
    fn default() -> Self {
        Self {
            title: "Pick an Image".to_string(),
        }
    }
}

#[cfg(feature = "dialog")]
#[async_trait]
impl MediaPicker for DialogPicker {
    async fn pick_image(&self) -> Result<String, PickError> {
        let handle = rfd::AsyncFileDialog::new()
            .set_title(self.title.as_str())
            .add_filter(
                "Images",
                &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "heic", "heif"],
            )
            .pick_file()
            .await
            .ok_or(PickError::UserCancelled)?;

        Ok(handle.path().to_string_lossy().into_owned())
    }
}
