//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, filesystem,
//! image picker) and the remote store credentials into the gallery core.
//! Desktop apps typically enable the `desktop-shims` feature (which depends
//! on `bridge-desktop`) and only supply credentials and a picker.

pub mod error;

pub use error::{CoreError, Result};

pub use core_gallery::{GalleryState, PendingSelection, Selection, UploadStatus};

use std::sync::Arc;

use bridge_traits::media::{MediaStore, RemoteAsset};
use bridge_traits::picker::MediaPicker;
use core_gallery::{GalleryReconciler, ReconcilerConfig, SelectionController};
use core_runtime::config::GalleryConfig;
use core_runtime::events::{EventBus, EventStream};
use provider_cloudinary::CloudinaryConnector;
use tokio::sync::watch;
use tracing::info;

#[cfg(feature = "desktop-shims")]
use core_runtime::config::MediaStoreConfig;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share the same gallery and selection.
#[derive(Clone)]
pub struct GalleryService {
    selection: Arc<SelectionController>,
    reconciler: Arc<GalleryReconciler>,
    event_bus: Arc<EventBus>,
}

impl GalleryService {
    /// Create a service backed by the Cloudinary connector.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or a required bridge has no
    /// implementation on this platform.
    pub fn new(config: GalleryConfig, event_bus: Arc<EventBus>) -> Result<Self> {
        config.validate()?;

        let http_client = config.resolve_http_client()?;
        let file_system = config.resolve_file_system()?;
        let connector = CloudinaryConnector::new(http_client, file_system, config.media_store.clone());

        info!(
            cloud_name = %config.media_store.cloud_name,
            list_limit = config.list_limit,
            "Gallery service initialized"
        );

        Ok(Self::with_store(
            Arc::new(connector),
            config.picker.clone(),
            event_bus,
            ReconcilerConfig::from(&config),
        ))
    }

    /// Create a service on top of any media store implementation.
    pub fn with_store(
        store: Arc<dyn MediaStore>,
        picker: Arc<dyn MediaPicker>,
        event_bus: Arc<EventBus>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            selection: Arc::new(SelectionController::new(picker, event_bus.clone())),
            reconciler: Arc::new(GalleryReconciler::new(store, event_bus.clone(), config)),
            event_bus,
        }
    }

    /// Ask the user for an image to upload.
    pub async fn pick(&self) -> Result<PendingSelection> {
        Ok(self.selection.pick().await?)
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Upload the pending selection.
    pub async fn upload(&self) -> Result<RemoteAsset> {
        Ok(self.reconciler.upload(&self.selection).await?)
    }

    pub async fn delete(&self, public_id: &str) -> Result<()> {
        Ok(self.reconciler.delete(public_id).await?)
    }

    /// Reload the gallery from the store.
    pub async fn refresh(&self) -> Result<GalleryState> {
        Ok(self.reconciler.refresh().await?)
    }

    pub fn gallery(&self) -> GalleryState {
        self.reconciler.snapshot()
    }

    pub fn subscribe_gallery(&self) -> watch::Receiver<GalleryState> {
        self.reconciler.subscribe_gallery()
    }

    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Selection> {
        self.selection.subscribe()
    }

    pub fn upload_status(&self) -> UploadStatus {
        self.reconciler.upload_status()
    }

    pub fn subscribe_upload_status(&self) -> watch::Receiver<UploadStatus> {
        self.reconciler.subscribe_upload_status()
    }

    /// Stream of gallery and selection events.
    pub fn events(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Uses `reqwest` and `tokio::fs` for the HTTP and file bridges.
///
/// ```no_run
/// # #[cfg(feature = "desktop-shims")]
/// # async fn example() -> core_service::Result<()> {
/// use bridge_desktop::PathPicker;
/// use core_runtime::config::MediaStoreConfig;
/// use core_service::bootstrap_desktop;
/// use std::sync::Arc;
///
/// let picker = Arc::new(PathPicker::with_path("/home/me/Pictures/cat.jpg"));
/// let service = bootstrap_desktop(MediaStoreConfig::from_env()?, picker)?;
/// service.refresh().await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    media_store: MediaStoreConfig,
    picker: Arc<dyn MediaPicker>,
) -> Result<GalleryService> {
    let config = GalleryConfig::builder()
        .media_store(media_store)
        .picker(picker)
        .build()?;
    GalleryService::new(config, Arc::new(EventBus::default()))
}
