//! Remote Media Store Abstraction
//!
//! Contract between the gallery core and a remote media-hosting service.
//! Connectors (e.g. `provider-cloudinary`) implement [`MediaStore`] and report
//! failures through the typed [`MediaStoreError`] taxonomy so that callers can
//! decide per kind whether to retry, reconfigure, or give up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An uploaded image as known by the remote store.
///
/// `public_id` and `url` are always assigned by the store, never by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Stable identifier, unique within the store
    pub public_id: String,

    /// Retrievable URL (HTTPS)
    pub url: String,

    /// Image format reported by the store (e.g. "jpg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Stored size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Creation time (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl RemoteAsset {
    /// Creates an asset with only the required fields.
    pub fn new(public_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            url: url.into(),
            format: None,
            bytes: None,
            width: None,
            height: None,
            created_at: None,
        }
    }
}

/// Failure kinds reported by a [`MediaStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaStoreError {
    /// Transport-level failure (connect, TLS, timeout). Retryable.
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials rejected or missing. Needs reconfiguration.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The input was refused (unsupported file, bad parameter).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The store answered with a non-success result.
    #[error("Remote store rejected the request (status {status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// The target no longer exists.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The store answered with an unexpected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl MediaStoreError {
    /// Whether the same call may succeed if issued again unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            MediaStoreError::Network(_) => true,
            MediaStoreError::RemoteRejected { status, .. } => *status == 429 || *status >= 500,
            MediaStoreError::Auth(_)
            | MediaStoreError::Validation(_)
            | MediaStoreError::NotFound(_)
            | MediaStoreError::MalformedResponse(_) => false,
        }
    }

    /// Short machine-readable name of the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MediaStoreError::Network(_) => "network",
            MediaStoreError::Auth(_) => "auth",
            MediaStoreError::Validation(_) => "validation",
            MediaStoreError::RemoteRejected { .. } => "remote_rejected",
            MediaStoreError::NotFound(_) => "not_found",
            MediaStoreError::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl From<crate::error::BridgeError> for MediaStoreError {
    fn from(error: crate::error::BridgeError) -> Self {
        match error {
            crate::error::BridgeError::Network(msg) => MediaStoreError::Network(msg),
            crate::error::BridgeError::Io(e) => MediaStoreError::Network(e.to_string()),
            other => MediaStoreError::Network(other.to_string()),
        }
    }
}

pub type MediaStoreResult<T> = std::result::Result<T, MediaStoreError>;

/// Remote media store trait
///
/// Implementations perform network calls only and hold no gallery state.
///
/// - `list` and `delete` are idempotent and safe to retry.
/// - `upload` is **not** idempotent. Retrying an upload whose response was lost
///   may create a second asset; implementations must not try to deduplicate.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::media::MediaStore;
///
/// async fn newest(store: &dyn MediaStore) -> Option<String> {
///     let assets = store.list(1).await.ok()?;
///     assets.into_iter().next().map(|a| a.url)
/// }
/// ```
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Fetch up to `limit` assets in store-defined order.
    async fn list(&self, limit: u32) -> MediaStoreResult<Vec<RemoteAsset>>;

    /// Upload the local file at `local_uri` and return the created asset.
    async fn upload(&self, local_uri: &str) -> MediaStoreResult<RemoteAsset>;

    /// Delete the asset identified by `public_id`.
    async fn delete(&self, public_id: &str) -> MediaStoreResult<()>;
}
