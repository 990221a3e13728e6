//! # Selection Controller
//!
//! Holds at most one picked-but-not-uploaded image. A new pick replaces the
//! previous one; a cancelled pick leaves the current selection alone.
//!
//! The selection is published through a `watch` channel so views can render
//! the pending preview without polling.

use crate::error::{GalleryError, Result};
use crate::state::{PendingSelection, Selection};
use bridge_traits::picker::{MediaPicker, PickError};
use core_runtime::events::{CoreEvent, EventBus, SelectionEvent};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

pub struct SelectionController {
    picker: Arc<dyn MediaPicker>,
    state: watch::Sender<Selection>,
    event_bus: Arc<EventBus>,
}

impl SelectionController {
    pub fn new(picker: Arc<dyn MediaPicker>, event_bus: Arc<EventBus>) -> Self {
        let (state, _) = watch::channel(Selection::Empty);
        Self {
            picker,
            state,
            event_bus,
        }
    }

    /// Asks the picker for an image and holds it as the pending selection.
    ///
    /// # Errors
    ///
    /// `GalleryError::Pick` when the user cancels or the picker fails. On
    /// cancellation the previous selection, if any, is kept.
    #[instrument(skip(self))]
    pub async fn pick(&self) -> Result<PendingSelection> {
        let outcome = self
            .picker
            .pick_image()
            .await
            .and_then(|uri| match uri.trim() {
                "" => Err(PickError::Unavailable(
                    "Picker returned no image".to_string(),
                )),
                trimmed => Ok(PendingSelection::new(trimmed)),
            });

        match outcome {
            Ok(pending) => {
                info!(file = %pending.file_name(), "Image selected");
                self.state.send_replace(Selection::Holding(pending.clone()));
                self.event_bus
                    .emit(CoreEvent::Selection(SelectionEvent::Picked {
                        file_name: pending.file_name().to_string(),
                    }))
                    .ok();
                Ok(pending)
            }
            Err(PickError::UserCancelled) => {
                debug!("Pick cancelled, keeping current selection");
                self.event_bus
                    .emit(CoreEvent::Selection(SelectionEvent::PickCancelled))
                    .ok();
                Err(GalleryError::Pick(PickError::UserCancelled))
            }
            Err(e) => {
                warn!(error = %e, "Pick failed");
                self.event_bus
                    .emit(CoreEvent::Selection(SelectionEvent::PickFailed {
                        message: e.to_string(),
                    }))
                    .ok();
                Err(GalleryError::Pick(e))
            }
        }
    }

    /// Drops the pending selection. Clearing an empty selection is a no-op.
    pub fn clear(&self) {
        let cleared = self.state.send_if_modified(|selection| {
            if selection.is_empty() {
                return false;
            }
            *selection = Selection::Empty;
            true
        });

        if cleared {
            debug!("Selection cleared");
            self.event_bus
                .emit(CoreEvent::Selection(SelectionEvent::Cleared))
                .ok();
        }
    }

    pub fn current(&self) -> Selection {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.state.subscribe()
    }

    /// Clears the selection only if it still holds `uploaded`.
    ///
    /// A pick made while the upload was in flight is kept. Returns whether
    /// the selection was cleared.
    pub(crate) fn settle(&self, uploaded: &PendingSelection) -> bool {
        let settled = self.state.send_if_modified(|selection| {
            if selection.pending() != Some(uploaded) {
                return false;
            }
            *selection = Selection::Empty;
            true
        });

        if settled {
            self.event_bus
                .emit(CoreEvent::Selection(SelectionEvent::Cleared))
                .ok();
        }

        settled
    }
}
