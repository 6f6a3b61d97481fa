//! Schemaviz CLI - render schema diagrams and classify table types

mod cli;

use clap::Parser;
use schemaviz::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    let log_level = std::env::var("SCHEMAVIZ_LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| cli_args.log_level.as_str().to_string());
    let log_format = std::env::var("SCHEMAVIZ_LOG_FORMAT")
        .ok()
        .unwrap_or_else(|| cli_args.log_format.as_str().to_string());

    if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::SchemavizApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
