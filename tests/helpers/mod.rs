//! Test helpers module
//!
//! Shared fixtures for the integration tests: seeded in-memory backends,
//! translation file trees in temporary directories, and options presets.

#![allow(dead_code)]

pub mod fixtures;
pub mod test_data;

pub use fixtures::*;
pub use test_data::*;
