//! Tests for logging initialization
//!
//! Only one global subscriber can be installed per process, so most calls
//! here are expected to fail after the first; they must not panic.

use schemaviz::core::logging::{init_logging, LogFormat};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("syslog").is_err());
}

#[test]
fn test_init_logging_with_levels_and_formats() {
    for level in ["trace", "debug", "info", "warn", "error", "off"] {
        let _ = init_logging(Some(level), Some("compact"));
    }
    for format in LogFormat::variants() {
        let _ = init_logging(Some("info"), Some(*format));
    }
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_render_logs_do_not_panic_with_subscriber() {
    use schemaviz::{DiagramOutputFormat, DiagramRenderer, EngineConfig};

    let _ = init_logging(Some("trace"), Some("compact"));
    let dir = tempfile::tempdir().unwrap();
    let dot_file = dir.path().join("schema.dot");
    std::fs::write(&dot_file, "digraph { a -> b }").unwrap();

    let renderer = DiagramRenderer::with_config(
        &EngineConfig::new()
            .with_dot_program("/nonexistent/schemaviz/dot")
            .with_builtin(false),
    );
    let result = renderer.render(
        &dot_file,
        &dir.path().join("schema.svg"),
        DiagramOutputFormat::Svg,
    );
    assert!(result.is_err());
}
