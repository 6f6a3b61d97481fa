//! Schemaviz - table type classification and schema diagram rendering
//!
//! Two independent pieces used by schema documentation tools:
//!
//! - [`TableType`] classifies the relation types a database reports and
//!   orders them deterministically (tables, then views, then everything else).
//! - [`DiagramRenderer`] turns a DOT file into a diagram, trying Graphviz
//!   first and falling back to a builtin engine when it is not installed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use schemaviz::{generate_graph, DiagramOutputFormat};
//! use std::path::Path;
//!
//! generate_graph(
//!     Path::new("schema.dot"),
//!     Path::new("schema.svg"),
//!     DiagramOutputFormat::Svg,
//! )?;
//! # Ok::<(), schemaviz::SchemaError>(())
//! ```
//!
//! # Custom Engines
//!
//! ```rust,no_run
//! use schemaviz::prelude::*;
//! use std::path::Path;
//!
//! let config = EngineConfig::new()
//!     .with_dot_program("/opt/graphviz/bin/dot")
//!     .with_builtin(false);
//! let renderer = DiagramRenderer::with_config(&config);
//! renderer.render(
//!     Path::new("schema.dot"),
//!     Path::new("schema.png"),
//!     DiagramOutputFormat::Png,
//! )?;
//! # Ok::<(), SchemaError>(())
//! ```

pub mod core;
pub mod engines;
pub mod renderer;

use std::path::Path;

pub use core::*;
pub use renderer::{normalize_source, DiagramRenderer, EngineStatus};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CapabilityUnavailable, DiagramOutputFormat, Engine, EngineConfig, EngineError,
        EngineProbe, GraphFormat, RenderFailure, SchemaError, TableType,
    };
    pub use crate::engines::{BuiltinEngine, GraphvizCommandEngine};
    pub use crate::renderer::DiagramRenderer;
}

/// Render a DOT file with the default engines
///
/// Shorthand for [`DiagramRenderer::new`] followed by
/// [`DiagramRenderer::render`].
pub fn generate_graph(
    dot_file: &Path,
    output_file: &Path,
    format: DiagramOutputFormat,
) -> Result<(), SchemaError> {
    DiagramRenderer::new().render(dot_file, output_file, format)
}
