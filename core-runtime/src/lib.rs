//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media gallery core:
//! - Logging and tracing infrastructure
//! - Configuration management (media store credentials, gallery settings)
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other modules depend on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder, and the event broadcasting used to notify the presentation layer.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
