//! Integration tests for logging functionality

use anonsearch::adapters::lattice::GridLattice;
use anonsearch::adapters::oracle::SyntheticChecker;
use anonsearch::config::LoggingConfig;
use anonsearch::core::driver::{AlgorithmKind, SearchDriver};
use anonsearch::core::search::FlashStrategy;
use anonsearch::logging::{init_logging, parse_log_level};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_parse_log_level_rejects_unknown() {
    assert!(parse_log_level("verbose").is_err());
    assert!(parse_log_level("WARN").is_ok());
}

// Installs the global subscriber, so this is the only test in this file that
// initializes logging.
#[test]
fn test_file_logging_writes_search_events() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    assert!(guard.has_file_writer());
    assert!(log_path.is_dir());

    // A second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::default()).is_err());

    let mut lattice = GridLattice::new(vec![1, 1]).unwrap();
    let mut checker = SyntheticChecker::new(
        |g: &[u32]| g.iter().sum::<u32>() >= 1,
        |g: &[u32]| g.iter().sum::<u32>() as f64,
    );
    let strategy = FlashStrategy::new(&lattice);
    SearchDriver::new(Duration::from_secs(1))
        .run(AlgorithmKind::Flash, &mut lattice, &mut checker, &strategy)
        .unwrap();

    // Dropping the guard flushes the non-blocking writer
    drop(guard);

    let contents: String = std::fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("anonsearch.log"))
        .map(|entry| std::fs::read_to_string(entry.path()).unwrap())
        .collect();
    assert!(contents.contains("Search completed"));
    assert!(contents.contains("\"algorithm\":\"FLASH\""));
}
