//! Configuration management module
//!
//! This module handles loading and validation of resolver, store and
//! logging configuration from files and environment variables.

pub mod settings;
pub mod validation;

pub use settings::{LoggingConfig, ResolverConfig, Settings, StoreConfig};
