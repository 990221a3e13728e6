//! # Core Gallery
//!
//! Selection and reconciliation logic for a remote image gallery.
//!
//! - [`SelectionController`] holds the one image picked but not yet uploaded.
//! - [`GalleryReconciler`] talks to a [`MediaStore`](bridge_traits::media::MediaStore)
//!   and keeps [`GalleryState`] consistent with it.
//!
//! Both publish their state through `tokio::sync::watch` channels and report
//! outcomes as [`GalleryEvent`](core_runtime::events::GalleryEvent)s on the
//! shared event bus.

pub mod error;
pub mod reconciler;
pub mod selection;
pub mod state;

pub use error::{GalleryError, Result};
pub use reconciler::{GalleryReconciler, ReconcilerConfig, NO_SELECTION_MESSAGE};
pub use selection::SelectionController;
pub use state::{GalleryState, PendingSelection, Selection, UploadStatus};
