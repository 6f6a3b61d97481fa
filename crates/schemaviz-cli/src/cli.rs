//! Command-line interface for the schemaviz utility
//!
//! Renders DOT files into diagrams, reports which rendering engines are
//! available, and sorts table type listings the way schema reports do.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use schemaviz::core::sort_and_dedup;
use schemaviz::{DiagramOutputFormat, DiagramRenderer, EngineConfig, TableType};

/// Schemaviz - schema diagram rendering and table type classification
#[derive(Parser)]
#[command(name = "schemaviz")]
#[command(about = "Render schema diagrams from DOT files and classify table types")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Engine selection flags shared by commands that probe engines
#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// Graphviz executable to use
    #[arg(long, default_value = "dot")]
    pub dot_program: PathBuf,

    /// Do not fall back to the builtin engine
    #[arg(long)]
    pub no_builtin: bool,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_dot_program(self.dot_program.clone())
            .with_builtin(!self.no_builtin)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a DOT file into a diagram
    Render {
        /// DOT file describing the diagram
        #[arg(short, long)]
        input: PathBuf,

        /// Diagram file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Output format; inferred from the output extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<FormatChoice>,

        #[command(flatten)]
        engines: EngineArgs,
    },

    /// Show which rendering engines are available
    Engines {
        /// Show in JSON format
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        engines: EngineArgs,
    },

    /// Sort and de-duplicate table types as a schema report lists them
    TableTypes {
        /// Table types as reported by the database
        #[arg(required = true)]
        labels: Vec<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Diagram output formats accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Svg,
    Png,
    Ps,
    Xdot,
    Plain,
    Pdf,
    Jpg,
    Gif,
    Htmlx,
}

impl From<FormatChoice> for DiagramOutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Svg => DiagramOutputFormat::Svg,
            FormatChoice::Png => DiagramOutputFormat::Png,
            FormatChoice::Ps => DiagramOutputFormat::Ps,
            FormatChoice::Xdot => DiagramOutputFormat::Xdot,
            FormatChoice::Plain => DiagramOutputFormat::Plain,
            FormatChoice::Pdf => DiagramOutputFormat::Pdf,
            FormatChoice::Jpg => DiagramOutputFormat::Jpg,
            FormatChoice::Gif => DiagramOutputFormat::Gif,
            FormatChoice::Htmlx => DiagramOutputFormat::Htmlx,
        }
    }
}

#[derive(Serialize)]
struct EngineReport {
    name: String,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize)]
struct TableTypeReport {
    table_type: String,
    name: String,
    is_view: bool,
}

/// Main CLI application
pub struct SchemavizApp;

impl SchemavizApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Render {
                input,
                output,
                format,
                engines,
            } => self.render_command(&input, &output, format, &engines),
            Commands::Engines { json, engines } => self.engines_command(json, &engines),
            Commands::TableTypes { labels, json } => self.table_types_command(&labels, json),
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        input: &Path,
        output: &Path,
        format: Option<FormatChoice>,
        engines: &EngineArgs,
    ) -> Result<()> {
        let format = match format {
            Some(choice) => choice.into(),
            None => infer_format(output),
        };
        debug!(format = %format, "Selected output format");

        let renderer = DiagramRenderer::with_config(&engines.config());
        renderer.render(input, output, format)?;
        eprintln!("Wrote {} diagram to {}", format, output.display());
        Ok(())
    }

    /// Handle the engines command
    fn engines_command(&self, json: bool, engines: &EngineArgs) -> Result<()> {
        let renderer = DiagramRenderer::with_config(&engines.config());
        let reports: Vec<EngineReport> = renderer
            .engine_statuses()
            .into_iter()
            .map(|status| EngineReport {
                name: status.name,
                available: status.available,
                reason: status.reason,
            })
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            println!("Rendering engines (in preference order):");
            for report in &reports {
                match &report.reason {
                    None => println!("  {:<14} available", report.name),
                    Some(reason) => println!("  {:<14} unavailable ({})", report.name, reason),
                }
            }
        }
        Ok(())
    }

    /// Handle the table-types command
    fn table_types_command(&self, labels: &[String], json: bool) -> Result<()> {
        let types = labels
            .iter()
            .map(|label| {
                TableType::new(label).with_context(|| format!("Invalid table type {:?}", label))
            })
            .collect::<Result<Vec<_>>>()?;

        let reports: Vec<TableTypeReport> = sort_and_dedup(types)
            .iter()
            .map(|table_type| TableTypeReport {
                table_type: table_type.table_type().to_string(),
                name: table_type.to_string(),
                is_view: table_type.is_view(),
            })
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for line in table_type_lines(&reports) {
                println!("{}", line);
            }
        }
        Ok(())
    }
}

impl Default for SchemavizApp {
    fn default() -> Self {
        Self::new()
    }
}

/// One text line per table type; only views are singled out
fn table_type_lines(reports: &[TableTypeReport]) -> Vec<String> {
    reports
        .iter()
        .map(|report| {
            let kind = if report.is_view { "view" } else { "other" };
            format!("{:<24} {}", report.table_type, kind)
        })
        .collect()
}

/// Output format from the file extension, defaulting to SVG
fn infer_format(output: &Path) -> DiagramOutputFormat {
    output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| match ext.to_lowercase().as_str() {
            "txt" => Some(DiagramOutputFormat::Plain),
            "html" => Some(DiagramOutputFormat::Htmlx),
            other => other.parse().ok(),
        })
        .unwrap_or_default()
}
