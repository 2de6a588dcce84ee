//! Integration tests for logging system

use core_runtime::logging::{default_filter, init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_initialization_happens_once_per_process() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_spans(false);

    init_logging(config.clone()).expect("first initialization succeeds");
    tracing::info!(target: "core_runtime", "logging initialized");

    // A global subscriber is already installed
    let second = init_logging(config);
    assert!(matches!(second, Err(Error::Config(_))));
}

#[test]
fn test_invalid_custom_filter_is_rejected_before_install() {
    let config = LoggingConfig::default().with_filter("core_sync=notalevel");
    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}

#[test]
fn test_default_filter_covers_workspace_crates() {
    let filter = default_filter(LogLevel::Warn);
    for target in [
        "folder_sync",
        "core_runtime",
        "core_sync",
        "core_service",
        "provider_remote",
        "bridge_desktop",
    ] {
        assert!(
            filter.contains(&format!("{}=warn", target)),
            "missing directive for {}",
            target
        );
    }
}
