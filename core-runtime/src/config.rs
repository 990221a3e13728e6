//! # Core Configuration Module
//!
//! Provides configuration management for the media gallery core.
//!
//! ## Overview
//!
//! Two layers of configuration are built once at startup and injected, never
//! read from ambient global state:
//!
//! - [`MediaStoreConfig`] holds the remote store credentials and endpoint. It
//!   is loaded from the environment ([`MediaStoreConfig::from_env`]) or set
//!   explicitly. Its `Debug` output never reveals the API key or secret.
//! - [`GalleryConfig`] wires the host bridges and reconciliation settings.
//!   It is constructed through [`GalleryConfigBuilder`], which validates
//!   fail-fast and reports missing capabilities with actionable messages.
//!
//! ## Required Dependencies
//!
//! - `MediaStoreConfig` - Remote store credentials
//! - `MediaPicker` - Native image picker
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `FileSystemAccess` - Reading picked files (desktop default: tokio fs)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{GalleryConfig, MediaStoreConfig};
//! use std::sync::Arc;
//!
//! let config = GalleryConfig::builder()
//!     .media_store(MediaStoreConfig::from_env()?)
//!     .picker(Arc::new(MyPicker))
//!     .list_limit(50)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::GalleryConfig;
//!
//! // Fails with an actionable message: no media store and no picker
//! let config = GalleryConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required configuration");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{FileSystemAccess, HttpClient, MediaPicker};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default Cloudinary REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Default number of assets fetched per refresh.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Largest page the store accepts for a listing.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Default bound on any single store operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default transport-level request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
const ENV_API_KEY: &str = "CLOUDINARY_API_KEY";
const ENV_API_SECRET: &str = "CLOUDINARY_API_SECRET";
const ENV_UPLOAD_PRESET: &str = "CLOUDINARY_UPLOAD_PRESET";
const ENV_FOLDER: &str = "CLOUDINARY_FOLDER";
const ENV_API_BASE_URL: &str = "CLOUDINARY_API_BASE_URL";

// ============================================================================
// Media Store Configuration
// ============================================================================

/// Credentials and endpoint of the remote media store.
///
/// # Security Note
///
/// Credentials must never be hardcoded in the binary. Load them from the
/// environment or the host's secure configuration. The `Debug` impl prints
/// `***` in place of the API key and secret.
///
/// # Example
///
/// ```
/// use core_runtime::config::MediaStoreConfig;
///
/// let config = MediaStoreConfig::new("demo", "key", "hunter2", "unsigned_preset")
///     .with_folder("Home");
///
/// assert!(config.validate().is_ok());
/// assert!(!format!("{:?}", config).contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MediaStoreConfig {
    /// Cloud (account) name, part of every endpoint path
    pub cloud_name: String,

    /// API key used for Basic auth on list and delete
    pub api_key: String,

    /// API secret used for Basic auth on list and delete
    pub api_secret: String,

    /// Unsigned upload preset
    pub upload_preset: String,

    /// Folder uploads go to and listings are restricted to
    pub folder: Option<String>,

    /// REST base URL without the cloud name
    pub api_base_url: String,

    /// Transport-level timeout for a single HTTP request
    pub request_timeout: Duration,
}

impl MediaStoreConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        upload_preset: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            upload_preset: upload_preset.into(),
            folder: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Loads the configuration from `CLOUDINARY_*` environment variables.
    ///
    /// `CLOUDINARY_FOLDER` and `CLOUDINARY_API_BASE_URL` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    Error::Config(format!(
                        "Environment variable {} is required for the media store",
                        key
                    ))
                })
        };

        let mut config = Self::new(
            required(ENV_CLOUD_NAME)?,
            required(ENV_API_KEY)?,
            required(ENV_API_SECRET)?,
            required(ENV_UPLOAD_PRESET)?,
        );

        if let Some(folder) = lookup(ENV_FOLDER).filter(|f| !f.trim().is_empty()) {
            config = config.with_folder(folder);
        }
        if let Some(base) = lookup(ENV_API_BASE_URL).filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base_url(base);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Overrides the REST base URL (used against local test servers).
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("Cloud name", &self.cloud_name),
            ("API key", &self.api_key),
            ("API secret", &self.api_secret),
            ("Upload preset", &self.upload_preset),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        if self.cloud_name.contains('/') {
            return Err(Error::Config(
                "Cloud name must not contain '/'".to_string(),
            ));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(Error::Config(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }

        if let Some(folder) = &self.folder {
            let trimmed = folder.trim_matches('/');
            if trimmed.is_empty() {
                return Err(Error::Config("Folder cannot be empty".to_string()));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of an endpoint below the cloud, e.g. `endpoint("image/upload")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.cloud_name,
            path.trim_start_matches('/')
        )
    }

    /// Folder without surrounding slashes, if configured.
    pub fn folder_name(&self) -> Option<&str> {
        self.folder.as_deref().map(|f| f.trim_matches('/'))
    }
}

impl fmt::Debug for MediaStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStoreConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("upload_preset", &self.upload_preset)
            .field("folder", &self.folder)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

// ============================================================================
// Gallery Configuration
// ============================================================================

/// Configuration for the gallery core.
///
/// Holds all dependencies and settings required to build the connector and
/// the reconciliation components. Use [`GalleryConfigBuilder`] to construct
/// instances.
#[derive(Clone)]
pub struct GalleryConfig {
    /// Remote store credentials and endpoint
    pub media_store: MediaStoreConfig,

    /// HTTP client for API requests (optional with desktop default)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// File system access for picked files (optional with desktop default)
    pub file_system: Option<Arc<dyn FileSystemAccess>>,

    /// Native image picker (required)
    pub picker: Arc<dyn MediaPicker>,

    /// Page size used by refresh
    pub list_limit: u32,

    /// Bound on each store call; an expired call counts as a network failure
    pub operation_timeout: Duration,

    /// Issue a full refresh after every successful upload
    pub refresh_after_upload: bool,
}

impl fmt::Debug for GalleryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryConfig")
            .field("media_store", &self.media_store)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field(
                "file_system",
                &self
                    .file_system
                    .as_ref()
                    .map(|_| "FileSystemAccess { ... }"),
            )
            .field("picker", &"MediaPicker { ... }")
            .field("list_limit", &self.list_limit)
            .field("operation_timeout", &self.operation_timeout)
            .field("refresh_after_upload", &self.refresh_after_upload)
            .finish()
    }
}

impl GalleryConfig {
    /// Creates a new builder for constructing a `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The media store configuration is complete
    /// - The list limit is within what the store accepts
    /// - The operation timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        self.media_store.validate()?;

        if self.list_limit == 0 {
            return Err(Error::Config(
                "List limit must be greater than 0".to_string(),
            ));
        }

        if self.list_limit > MAX_LIST_LIMIT {
            return Err(Error::Config(format!(
                "List limit exceeds maximum of {}",
                MAX_LIST_LIMIT
            )));
        }

        if self.operation_timeout.is_zero() {
            return Err(Error::Config(
                "Operation timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the configured HTTP client or the platform default.
    pub fn resolve_http_client(&self) -> Result<Arc<dyn HttpClient>> {
        match &self.http_client {
            Some(client) => Ok(client.clone()),
            None => provide_default_http_client(self.media_store.request_timeout),
        }
    }

    /// Returns the configured file system or the platform default.
    pub fn resolve_file_system(&self) -> Result<Arc<dyn FileSystemAccess>> {
        match &self.file_system {
            Some(fs) => Ok(fs.clone()),
            None => provide_default_file_system(),
        }
    }
}

fn picker_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaPicker".to_string(),
        message: "MediaPicker implementation is required to select images. \
                 Desktop: use bridge_desktop::PathPicker, or DialogPicker with the 'dialog' feature. \
                 Mobile: inject the platform photo library picker."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout).map_err(|e| {
        Error::Internal(format!("Failed to initialize default HttpClient: {}", e))
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the media store. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Mobile: inject a platform-native HTTP client."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    let fs: Arc<dyn FileSystemAccess> = Arc::new(TokioFileSystem::new());
    Ok(fs)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "FileSystemAccess implementation is required to read picked images. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default TokioFileSystem. \
                 Mobile: inject sandbox-aware file access."
            .to_string(),
    })
}

/// Builder for constructing [`GalleryConfig`] instances.
///
/// Call [`build()`](GalleryConfigBuilder::build) to validate and create the
/// final config.
#[derive(Default)]
pub struct GalleryConfigBuilder {
    media_store: Option<MediaStoreConfig>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    picker: Option<Arc<dyn MediaPicker>>,
    list_limit: Option<u32>,
    operation_timeout: Option<Duration>,
    refresh_after_upload: bool,
}

impl GalleryConfigBuilder {
    /// Sets the media store configuration (required).
    pub fn media_store(mut self, config: MediaStoreConfig) -> Self {
        self.media_store = Some(config);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    ///
    /// If not provided, the desktop default (tokio fs-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the image picker implementation (required).
    pub fn picker(mut self, picker: Arc<dyn MediaPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Sets how many assets a refresh fetches.
    ///
    /// Default: 100
    pub fn list_limit(mut self, limit: u32) -> Self {
        self.list_limit = Some(limit);
        self
    }

    /// Sets the bound on each store call.
    ///
    /// Default: 60 seconds
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Enables a full refresh after each successful upload.
    ///
    /// Default: false
    pub fn refresh_after_upload(mut self, enabled: bool) -> Self {
        self.refresh_after_upload = enabled;
        self
    }

    /// Builds the final `GalleryConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(GalleryConfig)` on success, or an error if:
    /// - The media store configuration is missing or invalid
    /// - No picker was provided
    /// - Limits or timeouts are out of range
    pub fn build(self) -> Result<GalleryConfig> {
        let media_store = self.media_store.ok_or_else(|| {
            Error::Config(
                "Media store configuration is required. Use .media_store() to set it."
                    .to_string(),
            )
        })?;

        let picker = self.picker.ok_or_else(picker_missing_error)?;

        let config = GalleryConfig {
            media_store,
            http_client: self.http_client,
            file_system: self.file_system,
            picker,
            list_limit: self.list_limit.unwrap_or(DEFAULT_LIST_LIMIT),
            operation_timeout: self.operation_timeout.unwrap_or(DEFAULT_OPERATION_TIMEOUT),
            refresh_after_upload: self.refresh_after_upload,
        };

        config.validate()?;

        Ok(config)
    }
}
