//! Core error types for classification and diagram rendering
//!
//! [`SchemaError`] is the only error callers of the public API see. Rendering
//! failures from any stage are folded into
//! [`SchemaError::DiagramGenerationFailed`], which keeps the DOT file path and
//! the underlying [`RenderFailure`] as its source.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use super::format::{DiagramOutputFormat, GraphFormat};

/// Errors surfaced by the public API
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A required input was missing or blank
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Any failure while turning a DOT file into a diagram
    #[error("Cannot generate diagram from {}", .dot_file.display())]
    DiagramGenerationFailed {
        dot_file: PathBuf,
        #[source]
        cause: RenderFailure,
    },
}

impl SchemaError {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wrap a rendering failure for the given DOT file
    pub fn generation_failed(dot_file: impl Into<PathBuf>, cause: RenderFailure) -> Self {
        Self::DiagramGenerationFailed {
            dot_file: dot_file.into(),
            cause,
        }
    }

    /// The rendering failure behind this error, if any
    pub fn render_failure(&self) -> Option<&RenderFailure> {
        match self {
            Self::DiagramGenerationFailed { cause, .. } => Some(cause),
            Self::InvalidArgument { .. } => None,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// True when rendering was refused because the format has no engine mapping
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self.render_failure(), Some(RenderFailure::UnsupportedFormat { .. }))
    }
}

/// The stage of the rendering pipeline that failed
#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error("Unsupported output format, {format}")]
    UnsupportedFormat { format: DiagramOutputFormat },

    #[error("Cannot read DOT source: {source}")]
    SourceUnreadable {
        #[from]
        source: std::io::Error,
    },

    #[error("No diagram rendering engine is available")]
    NoEngineAvailable,

    #[error("Engine {engine} failed: {source}")]
    EngineFailed {
        engine: String,
        #[source]
        source: EngineError,
    },
}

/// Errors raised by a single rendering engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cannot start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Engine cannot produce {format} output")]
    UnsupportedFormat { format: GraphFormat },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl EngineError {
    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// An engine whose runtime requirements are missing
///
/// Probes return this instead of failing; the renderer logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot load {engine}: {reason}")]
pub struct CapabilityUnavailable {
    pub engine: String,
    pub reason: String,
}

impl CapabilityUnavailable {
    pub fn new(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_argument() {
        let error = SchemaError::invalid_argument("No table type provided");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid argument"));
        assert!(error_msg.contains("No table type provided"));
        assert!(error.is_invalid_argument());
        assert!(error.render_failure().is_none());
    }

    #[test]
    fn test_generation_failed_names_dot_file() {
        let error = SchemaError::generation_failed(
            "schema.dot",
            RenderFailure::NoEngineAvailable,
        );
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Cannot generate diagram from"));
        assert!(error_msg.contains("schema.dot"));
        assert!(!error.is_unsupported_format());
    }

    #[test]
    fn test_generation_failed_keeps_cause() {
        let error = SchemaError::generation_failed(
            "schema.dot",
            RenderFailure::UnsupportedFormat {
                format: DiagramOutputFormat::Pdf,
            },
        );
        assert!(error.is_unsupported_format());
        let source = error.source().expect("wrapped cause");
        assert!(source.to_string().contains("pdf"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let failure: RenderFailure = io_err.into();
        let error_msg = format!("{}", failure);
        assert!(error_msg.contains("Cannot read DOT source"));
        assert!(error_msg.contains("File not found"));
    }

    #[test]
    fn test_engine_failed_chain() {
        let failure = RenderFailure::EngineFailed {
            engine: "builtin".to_string(),
            source: EngineError::parse_error("unexpected '}'"),
        };
        assert!(failure.to_string().contains("builtin"));
        let source = failure.source().expect("engine error");
        assert!(source.to_string().contains("unexpected '}'"));
    }

    #[test]
    fn test_capability_unavailable_display() {
        let missing = CapabilityUnavailable::new("graphviz-dot", "dot not found");
        assert_eq!(missing.to_string(), "Cannot load graphviz-dot: dot not found");
    }
}
