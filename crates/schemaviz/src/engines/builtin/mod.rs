//! Builtin pure-Rust engine
//!
//! The fallback when Graphviz is not installed. It handles the DOT subset
//! schema diagrams use and writes SVG or Graphviz `plain` output; any other
//! format is refused so the renderer can report it.

mod label;
pub mod layout;
pub mod parser;
pub mod writer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, span, Level};

use crate::core::{CapabilityUnavailable, Engine, EngineError, EngineProbe, GraphFormat};

pub use layout::Layout;
pub use parser::{parse_dot, DotEdge, DotGraph, DotNode, DotValue};

pub const BUILTIN_ENGINE: &str = "builtin";

/// Renders with the builtin DOT parser and rank layout
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl BuiltinEngine {
    pub fn new() -> Self {
        Self
    }

    /// Formats this engine can write
    pub fn supports(format: GraphFormat) -> bool {
        matches!(format, GraphFormat::Svg | GraphFormat::Plain)
    }
}

impl Engine for BuiltinEngine {
    fn name(&self) -> &str {
        BUILTIN_ENGINE
    }

    fn render(
        &self,
        source: &str,
        format: GraphFormat,
        output: &Path,
    ) -> Result<(), EngineError> {
        let render_span = span!(Level::DEBUG, "builtin_render", format = %format);
        let _enter = render_span.enter();

        if !Self::supports(format) {
            return Err(EngineError::UnsupportedFormat { format });
        }

        let graph = parse_dot(source).map_err(|e| EngineError::parse_error(e.to_string()))?;
        let layout = Layout::compute(&graph);
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Laid out graph"
        );

        let mut out = BufWriter::new(File::create(output)?);
        match format {
            GraphFormat::Plain => writer::write_plain(&mut out, &graph, &layout)?,
            _ => writer::write_svg(&mut out, &graph, &layout)?,
        }
        out.flush()?;
        Ok(())
    }
}

/// Loads [`BuiltinEngine`] unless it is compiled out or disabled
#[derive(Debug, Clone)]
pub struct BuiltinProbe {
    enabled: bool,
}

impl BuiltinProbe {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for BuiltinProbe {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EngineProbe for BuiltinProbe {
    fn name(&self) -> &str {
        BUILTIN_ENGINE
    }

    fn probe(&self) -> Result<Box<dyn Engine>, CapabilityUnavailable> {
        if !cfg!(feature = "builtin-engine") {
            return Err(CapabilityUnavailable::new(
                BUILTIN_ENGINE,
                "compiled without the builtin-engine feature",
            ));
        }
        if !self.enabled {
            return Err(CapabilityUnavailable::new(
                BUILTIN_ENGINE,
                "disabled by configuration",
            ));
        }
        Ok(Box::new(BuiltinEngine::new()))
    }
}
