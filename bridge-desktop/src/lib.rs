//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `MediaPicker` fed with host-chosen paths, or a native file dialog via
//!   `rfd` when the `dialog` feature is enabled
//!
//! ## Feature Flags
//!
//! - `dialog`: Enable the native file dialog picker
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{PathPicker, ReqwestHttpClient, TokioFileSystem};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let fs = Arc::new(TokioFileSystem::new());
//! let picker = Arc::new(PathPicker::with_path("/home/me/Pictures/cat.jpg"));
//! ```

mod filesystem;
mod http;
mod picker;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
pub use picker::PathPicker;

#[cfg(feature = "dialog")]
pub use picker::DialogPicker;
