//! # Cloudinary Provider
//!
//! Implements the `MediaStore` trait for the Cloudinary REST API.
//!
//! ## Overview
//!
//! This module provides:
//! - Listing uploaded images (Admin API, Basic auth)
//! - Unsigned preset uploads as `multipart/form-data`
//! - Deletion through the `destroy` endpoint
//! - Classification of every failure into the `MediaStoreError` taxonomy
//!
//! The connector holds no gallery state. Reconciliation is the caller's job.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::CloudinaryConnector;
pub use error::{CloudinaryError, Result};
