//! Logging initialization
//!
//! The global subscriber can be installed once per process, so these tests
//! run serially and tolerate an already-installed subscriber.

use keyglot::config::LoggingConfig;
use keyglot::utils::logging::init_logging;
use keyglot::KeyglotError;
use serial_test::serial;

#[test]
#[serial]
fn test_file_logging_creates_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let log_path = dir.path().join("logs").join("keyglot.log");
    let config = LoggingConfig {
        level: "debug".to_string(),
        file_path: Some(log_path.display().to_string()),
    };

    match init_logging(&config) {
        Ok(guard) => assert!(guard.is_some()),
        Err(KeyglotError::Config(message)) => assert!(message.contains("logger")),
        Err(other) => panic!("unexpected error: {}", other),
    }
    assert!(dir.path().join("logs").is_dir());
}

#[test]
#[serial]
fn test_second_initialization_fails_cleanly() {
    let config = LoggingConfig::default();
    let _ = init_logging(&config);

    let result = init_logging(&config);
    assert!(matches!(result, Err(KeyglotError::Config(_))));
}
