//! # Gallery Reconciler
//!
//! Keeps the local [`GalleryState`] in step with the remote store.
//!
//! ## Policies
//!
//! - **Refresh** replaces the snapshot wholesale with the store's listing.
//! - **Upload** prepends the returned asset as soon as the store accepts it.
//!   A follow-up refresh runs only when `refresh_after_upload` is set.
//! - **Delete** removes the asset after the store confirms. It is never
//!   applied optimistically. A store that no longer knows the asset counts as
//!   a successful delete.
//!
//! Every change is a single `watch` replace applied when the store call
//! completes, so concurrent operations resolve last-writer-wins by completion
//! order. Every store call is bounded by `operation_timeout`; an expired call
//! is reported as a network failure.

use crate::error::{GalleryError, Result};
use crate::selection::SelectionController;
use crate::state::{GalleryState, UploadStatus};
use bridge_traits::media::{MediaStore, MediaStoreError, MediaStoreResult, RemoteAsset};
use core_runtime::config::{GalleryConfig, DEFAULT_LIST_LIMIT, DEFAULT_OPERATION_TIMEOUT};
use core_runtime::events::{CoreEvent, EventBus, GalleryEvent};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Message reported when upload is requested with nothing selected.
pub const NO_SELECTION_MESSAGE: &str = "Please select an image first";

/// Reconciliation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Page size for `list`
    pub list_limit: u32,

    /// Bound on each store call
    pub operation_timeout: Duration,

    /// Issue a full refresh after each successful upload
    pub refresh_after_upload: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            refresh_after_upload: false,
        }
    }
}

impl From<&GalleryConfig> for ReconcilerConfig {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            list_limit: config.list_limit,
            operation_timeout: config.operation_timeout,
            refresh_after_upload: config.refresh_after_upload,
        }
    }
}

/// Owner of the gallery snapshot and the upload status.
pub struct GalleryReconciler {
    store: Arc<dyn MediaStore>,
    event_bus: Arc<EventBus>,
    config: ReconcilerConfig,
    gallery: watch::Sender<GalleryState>,
    upload_status: watch::Sender<UploadStatus>,
}

impl GalleryReconciler {
    pub fn new(
        store: Arc<dyn MediaStore>,
        event_bus: Arc<EventBus>,
        config: ReconcilerConfig,
    ) -> Self {
        let (gallery, _) = watch::channel(GalleryState::empty());
        let (upload_status, _) = watch::channel(UploadStatus::Idle);

        Self {
            store,
            event_bus,
            config,
            gallery,
            upload_status,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Replaces the gallery with the store's current listing.
    ///
    /// On failure the gallery is left as it was, except for a malformed
    /// listing, which empties it.
    #[instrument(skip(self), fields(limit = self.config.list_limit))]
    pub async fn refresh(&self) -> Result<GalleryState> {
        self.emit(GalleryEvent::RefreshStarted);

        match self.call("list", self.store.list(self.config.list_limit)).await {
            Ok(assets) => {
                let listed = assets.len();
                let state = GalleryState::from_listing(assets);
                if state.len() != listed {
                    warn!(
                        listed,
                        unique = state.len(),
                        "Listing contained duplicate public ids"
                    );
                }

                self.gallery.send_replace(state.clone());
                info!(count = state.len(), "Gallery refreshed");
                self.emit(GalleryEvent::Refreshed { count: state.len() });
                Ok(state)
            }
            Err(e) => {
                let cleared = matches!(e, MediaStoreError::MalformedResponse(_));
                if cleared {
                    self.gallery.send_replace(GalleryState::empty());
                }

                error!(error = %e, cleared, "Gallery refresh failed");
                self.emit(GalleryEvent::RefreshFailed {
                    message: e.to_string(),
                    kind: e.kind().to_string(),
                    recoverable: e.is_retryable(),
                    cleared,
                });
                Err(e.into())
            }
        }
    }

    /// Uploads the pending selection and prepends the stored asset.
    ///
    /// # Errors
    ///
    /// - `Store(Validation)` when nothing is selected; the status is untouched
    /// - `UploadInProgress` while another upload is in flight
    /// - `Store(..)` when the store call fails; the selection is kept
    #[instrument(skip(self, selection))]
    pub async fn upload(&self, selection: &SelectionController) -> Result<RemoteAsset> {
        let Some(pending) = selection.current().pending().cloned() else {
            let e = MediaStoreError::Validation(NO_SELECTION_MESSAGE.to_string());
            debug!("Upload requested without a selection");
            self.emit_upload_failed(&e);
            return Err(e.into());
        };

        let guard = self.begin_upload()?;
        info!(file = %pending.file_name(), "Uploading");
        self.emit(GalleryEvent::UploadStarted {
            file_name: pending.file_name().to_string(),
        });

        match self
            .call("upload", self.store.upload(&pending.local_uri))
            .await
        {
            Ok(asset) => {
                self.gallery
                    .send_modify(|gallery| *gallery = gallery.with_prepended(asset.clone()));
                guard.settle(UploadStatus::Succeeded);
                selection.settle(&pending);

                info!(public_id = %asset.public_id, "Upload succeeded");
                self.emit(GalleryEvent::UploadSucceeded {
                    public_id: asset.public_id.clone(),
                    url: asset.url.clone(),
                });

                if self.config.refresh_after_upload {
                    // Failure is already reported through RefreshFailed
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "Refresh after upload failed");
                    }
                }

                Ok(asset)
            }
            Err(e) => {
                guard.settle(UploadStatus::Failed);
                error!(error = %e, file = %pending.file_name(), "Upload failed");
                self.emit_upload_failed(&e);
                Err(e.into())
            }
        }
    }

    /// Deletes an asset from the store, then from the gallery.
    ///
    /// An asset the store no longer has is removed locally and reported as
    /// an unconfirmed delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, public_id: &str) -> Result<()> {
        match self.call("delete", self.store.delete(public_id)).await {
            Ok(()) => {
                self.remove(public_id);
                info!("Asset deleted");
                self.emit(GalleryEvent::Deleted {
                    public_id: public_id.to_string(),
                    confirmed: true,
                });
                Ok(())
            }
            Err(MediaStoreError::NotFound(_)) => {
                self.remove(public_id);
                info!("Asset already gone from store");
                self.emit(GalleryEvent::Deleted {
                    public_id: public_id.to_string(),
                    confirmed: false,
                });
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Delete failed");
                self.emit(GalleryEvent::DeleteFailed {
                    public_id: public_id.to_string(),
                    message: e.to_string(),
                    kind: e.kind().to_string(),
                    recoverable: e.is_retryable(),
                });
                Err(e.into())
            }
        }
    }

    pub fn snapshot(&self) -> GalleryState {
        self.gallery.borrow().clone()
    }

    pub fn upload_status(&self) -> UploadStatus {
        *self.upload_status.borrow()
    }

    pub fn subscribe_gallery(&self) -> watch::Receiver<GalleryState> {
        self.gallery.subscribe()
    }

    pub fn subscribe_upload_status(&self) -> watch::Receiver<UploadStatus> {
        self.upload_status.subscribe()
    }

    async fn call<T, F>(&self, operation: &'static str, future: F) -> MediaStoreResult<T>
    where
        F: Future<Output = MediaStoreResult<T>>,
    {
        match timeout(self.config.operation_timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = self.config.operation_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(MediaStoreError::Network(format!(
                    "{} timed out after {:?}",
                    operation, self.config.operation_timeout
                )))
            }
        }
    }

    fn begin_upload(&self) -> Result<InFlightGuard<'_>> {
        let mut claim = Ok(());
        self.upload_status.send_if_modified(|status| {
            if status.is_active() {
                claim = Err(GalleryError::UploadInProgress);
                return false;
            }
            match status.transition(UploadStatus::InFlight) {
                Ok(next) => {
                    *status = next;
                    true
                }
                Err(e) => {
                    claim = Err(e);
                    false
                }
            }
        });

        if let Err(e) = claim {
            warn!(error = %e, "Upload rejected");
            return Err(e);
        }

        Ok(InFlightGuard {
            status: &self.upload_status,
            settled: false,
        })
    }

    fn remove(&self, public_id: &str) {
        let removed = self.gallery.send_if_modified(|gallery| match gallery.without(public_id) {
            Some(next) => {
                *gallery = next;
                true
            }
            None => false,
        });

        if !removed {
            debug!(public_id, "Asset not in gallery, nothing to remove");
        }
    }

    fn emit_upload_failed(&self, e: &MediaStoreError) {
        let message = match e {
            MediaStoreError::Validation(message) => message.clone(),
            other => other.to_string(),
        };

        self.emit(GalleryEvent::UploadFailed {
            message,
            kind: e.kind().to_string(),
            recoverable: e.is_retryable(),
        });
    }

    fn emit(&self, event: GalleryEvent) {
        self.event_bus.emit(CoreEvent::Gallery(event)).ok();
    }
}

/// Moves the upload status out of `InFlight` exactly once.
///
/// Dropping an unsettled guard (the upload future was cancelled) marks the
/// upload as failed.
struct InFlightGuard<'a> {
    status: &'a watch::Sender<UploadStatus>,
    settled: bool,
}

impl InFlightGuard<'_> {
    fn settle(mut self, outcome: UploadStatus) {
        self.apply(outcome);
        self.settled = true;
    }

    fn apply(&self, outcome: UploadStatus) {
        self.status
            .send_if_modified(|status| match status.transition(outcome) {
                Ok(next) => {
                    *status = next;
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring upload status change");
                    false
                }
            });
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Upload abandoned while in flight");
            self.apply(UploadStatus::Failed);
        }
    }
}
