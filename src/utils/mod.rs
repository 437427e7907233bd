//! Utility modules
//!
//! This module contains common utilities used throughout the crate,
//! including error handling, logging setup and build-once keyed maps.

pub mod errors;
pub mod logging;
pub mod once_map;

pub use errors::{ErrorCategory, ErrorSeverity, KeyglotError, Result};
pub use once_map::OnceMap;
