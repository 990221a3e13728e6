//! # Gallery State Model
//!
//! Value types shared between the selection controller, the reconciler and
//! the presentation layer.
//!
//! ## Upload State Machine
//!
//! ```text
//! Idle → InFlight → Succeeded
//!           ↓   ↑       │
//!         Failed ←──────┘ (next upload starts from either outcome)
//! ```
//!
//! ## Gallery Snapshots
//!
//! [`GalleryState`] is immutable. Every reconciliation builds a new snapshot
//! and replaces the old one wholesale, so readers never observe a partially
//! applied change. `public_id`s are unique within a snapshot.

use crate::error::{GalleryError, Result};
use bridge_traits::media::RemoteAsset;
use core_runtime::logging::strip_path;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Selection
// ============================================================================

/// A picked image that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingSelection {
    pub local_uri: String,
}

impl PendingSelection {
    pub fn new(local_uri: impl Into<String>) -> Self {
        Self {
            local_uri: local_uri.into(),
        }
    }

    /// Base name of the local file, safe to log or display.
    pub fn file_name(&self) -> &str {
        strip_path(&self.local_uri)
    }
}

/// What the selection controller currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "pending", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Empty,
    Holding(PendingSelection),
}

impl Selection {
    pub fn pending(&self) -> Option<&PendingSelection> {
        match self {
            Selection::Empty => None,
            Selection::Holding(pending) => Some(pending),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

// ============================================================================
// Upload Status
// ============================================================================

/// Progress of the most recent upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// No upload attempted yet
    #[default]
    Idle,
    /// An upload is waiting on the store
    InFlight,
    /// The last upload was accepted
    Succeeded,
    /// The last upload failed; the selection is kept for a retry
    Failed,
}

impl UploadStatus {
    /// Check if this status represents a finished upload
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }

    /// Check if an upload is running
    pub fn is_active(&self) -> bool {
        matches!(self, UploadStatus::InFlight)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "idle",
            UploadStatus::InFlight => "in_flight",
            UploadStatus::Succeeded => "succeeded",
            UploadStatus::Failed => "failed",
        }
    }

    /// Returns the next status, or an error if `to` is not reachable from here.
    pub fn transition(self, to: UploadStatus) -> Result<UploadStatus> {
        let valid = match (self, to) {
            // A new upload may start from any settled state
            (UploadStatus::Idle, UploadStatus::InFlight) => true,
            (UploadStatus::Succeeded, UploadStatus::InFlight) => true,
            (UploadStatus::Failed, UploadStatus::InFlight) => true,

            // An upload in flight settles exactly once
            (UploadStatus::InFlight, UploadStatus::Succeeded) => true,
            (UploadStatus::InFlight, UploadStatus::Failed) => true,

            _ => false,
        };

        if !valid {
            return Err(GalleryError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }

        Ok(to)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Gallery Snapshot
// ============================================================================

/// Ordered, immutable mirror of the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    assets: Arc<[RemoteAsset]>,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            assets: Arc::from(Vec::new()),
        }
    }
}

impl GalleryState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from a store listing, keeping the store's order.
    ///
    /// Repeated `public_id`s keep their first occurrence.
    pub fn from_listing(assets: Vec<RemoteAsset>) -> Self {
        let mut seen = HashSet::with_capacity(assets.len());
        let unique: Vec<RemoteAsset> = assets
            .into_iter()
            .filter(|asset| seen.insert(asset.public_id.clone()))
            .collect();

        Self {
            assets: unique.into(),
        }
    }

    /// Returns a snapshot with `asset` first.
    ///
    /// An entry with the same `public_id` is dropped from its old position.
    pub fn with_prepended(&self, asset: RemoteAsset) -> Self {
        let assets: Vec<RemoteAsset> = std::iter::once(asset.clone())
            .chain(
                self.assets
                    .iter()
                    .filter(|existing| existing.public_id != asset.public_id)
                    .cloned(),
            )
            .collect();

        Self {
            assets: assets.into(),
        }
    }

    /// Returns a snapshot without `public_id`, or `None` if it is not present.
    pub fn without(&self, public_id: &str) -> Option<Self> {
        if !self.contains(public_id) {
            return None;
        }

        let assets: Vec<RemoteAsset> = self
            .assets
            .iter()
            .filter(|asset| asset.public_id != public_id)
            .cloned()
            .collect();

        Some(Self {
            assets: assets.into(),
        })
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.assets.iter().any(|asset| asset.public_id == public_id)
    }

    pub fn assets(&self) -> &[RemoteAsset] {
        &self.assets
    }

    pub fn public_ids(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.public_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemoteAsset> {
        self.assets.iter()
    }
}

impl From<Vec<RemoteAsset>> for GalleryState {
    fn from(assets: Vec<RemoteAsset>) -> Self {
        Self::from_listing(assets)
    }
}
