//! # Host Bridge Traits
//!
//! Capability traits that the gallery core requires from its host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and platform-specific
//! implementations. Each trait represents a capability the core needs but that is
//! provided differently per platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async HTTP with retry policies
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Reading picked local files
//!
//! ### Media
//! - [`MediaStore`](media::MediaStore) - Remote media store (list, upload, delete)
//! - [`MediaPicker`](picker::MediaPicker) - Native image picker
//!
//! ### Utilities
//! - [`LoggerSink`](log_sink::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ In Progress |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! Platform bridges report failures as [`BridgeError`](error::BridgeError).
//! Media stores use the richer [`MediaStoreError`](media::MediaStoreError)
//! taxonomy because the core reacts differently to each kind.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so they can be shared across async
//! tasks behind an `Arc`.

pub mod error;
pub mod http;
pub mod log_sink;
pub mod media;
pub mod multipart;
pub mod picker;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use log_sink::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaStore, MediaStoreError, MediaStoreResult, RemoteAsset};
pub use multipart::MultipartForm;
pub use picker::{MediaPicker, PickError};
pub use storage::{FileMetadata, FileSystemAccess};
