//! Rendering engine abstractions
//!
//! An [`Engine`] turns DOT source into a file. Engines can depend on things
//! that may be missing at runtime (an executable, a cargo feature), so each
//! one is reached through an [`EngineProbe`] that reports absence as a
//! [`CapabilityUnavailable`] value instead of failing.

use std::path::Path;

use super::error::{CapabilityUnavailable, EngineError};
use super::format::GraphFormat;

/// A backend that renders DOT source to a file
pub trait Engine: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Render `source` in `format` and write the result to `output`
    fn render(&self, source: &str, format: GraphFormat, output: &Path)
        -> Result<(), EngineError>;
}

/// Checks whether an engine can run here and builds it if so
pub trait EngineProbe: Send + Sync {
    /// Name of the engine this probe loads
    fn name(&self) -> &str;

    /// Build the engine, or report why it is unavailable
    fn probe(&self) -> Result<Box<dyn Engine>, CapabilityUnavailable>;
}
