//! Diagram renderer
//!
//! Runs the pipeline that turns a DOT file into a diagram file:
//! validate inputs → map format → read and normalize source → load engines →
//! render with the first engine that succeeds.
//!
//! Every failure after input validation is reported as
//! [`SchemaError::DiagramGenerationFailed`] with the DOT file path and the
//! [`RenderFailure`] that caused it. The renderer holds no state between
//! calls; engines are probed again on every render.

use std::fs;
use std::path::Path;

use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    map_format, DiagramOutputFormat, Engine, EngineConfig, EngineProbe, RenderFailure,
    SchemaError,
};
use crate::engines::default_probes;

/// Availability of one engine, as reported by its probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    pub name: String,
    pub available: bool,
    pub reason: Option<String>,
}

/// Renders DOT files through an ordered list of engines
pub struct DiagramRenderer {
    probes: Vec<Box<dyn EngineProbe>>,
}

impl DiagramRenderer {
    /// Create a renderer with the default engines and configuration
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a renderer with the default engines, configured
    pub fn with_config(config: &EngineConfig) -> Self {
        Self::with_probes(default_probes(config))
    }

    /// Create a renderer from probes listed in preference order
    pub fn with_probes(probes: Vec<Box<dyn EngineProbe>>) -> Self {
        Self { probes }
    }

    /// Names of the engines this renderer will try, in order
    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    /// Probe every engine and keep the available ones, in preference order
    pub fn load_engines(&self) -> Vec<Box<dyn Engine>> {
        let engines: Vec<Box<dyn Engine>> = self
            .probes
            .iter()
            .filter_map(|probe| match probe.probe() {
                Ok(engine) => {
                    trace!(engine = probe.name(), "Loaded engine");
                    Some(engine)
                }
                Err(missing) => {
                    info!(engine = %missing.engine, reason = %missing.reason, "Cannot load engine");
                    None
                }
            })
            .collect();
        debug!(available = engines.len(), "Engine discovery completed");
        engines
    }

    /// Probe every engine and report its availability
    pub fn engine_statuses(&self) -> Vec<EngineStatus> {
        self.probes
            .iter()
            .map(|probe| match probe.probe() {
                Ok(_) => EngineStatus {
                    name: probe.name().to_string(),
                    available: true,
                    reason: None,
                },
                Err(missing) => EngineStatus {
                    name: probe.name().to_string(),
                    available: false,
                    reason: Some(missing.reason),
                },
            })
            .collect()
    }

    /// Render `dot_file` into `output_file` in the requested format
    ///
    /// Empty paths are rejected with [`SchemaError::InvalidArgument`]. Any
    /// other failure, including a format with no engine mapping, is a
    /// [`SchemaError::DiagramGenerationFailed`]. The output file is left as
    /// the failing engine left it.
    pub fn render(
        &self,
        dot_file: &Path,
        output_file: &Path,
        format: DiagramOutputFormat,
    ) -> Result<(), SchemaError> {
        if dot_file.as_os_str().is_empty() {
            return Err(SchemaError::invalid_argument("No DOT file provided"));
        }
        if output_file.as_os_str().is_empty() {
            return Err(SchemaError::invalid_argument(
                "No diagram output file provided",
            ));
        }

        let render_span = span!(
            Level::INFO,
            "render_diagram",
            dot_file = %dot_file.display(),
            format = %format
        );
        let _enter = render_span.enter();

        self.generate(dot_file, output_file, format)
            .map_err(|cause| {
                warn!(error = %cause, "Diagram generation failed");
                SchemaError::generation_failed(dot_file, cause)
            })
    }

    fn generate(
        &self,
        dot_file: &Path,
        output_file: &Path,
        format: DiagramOutputFormat,
    ) -> Result<(), RenderFailure> {
        let graph_format =
            map_format(format).ok_or(RenderFailure::UnsupportedFormat { format })?;

        let source = normalize_source(&fs::read_to_string(dot_file)?);
        debug!(source_len = source.len(), "Normalized DOT source");

        let engines = self.load_engines();
        let mut last_failure = None;
        for engine in &engines {
            match engine.render(&source, graph_format, output_file) {
                Ok(()) => {
                    info!(
                        engine = engine.name(),
                        output = %output_file.display(),
                        "Generated diagram"
                    );
                    return Ok(());
                }
                Err(error) => {
                    warn!(
                        engine = engine.name(),
                        error = %error,
                        "Engine failed, trying next engine"
                    );
                    last_failure = Some(RenderFailure::EngineFailed {
                        engine: engine.name().to_string(),
                        source: error,
                    });
                }
            }
        }

        Err(last_failure.unwrap_or(RenderFailure::NoEngineAvailable))
    }
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse DOT source onto a single line
///
/// Each line break (`\n`, `\r\n` or `\r`) becomes one space. A trailing line
/// break is dropped.
pub fn normalize_source(source: &str) -> String {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .collect::<Vec<_>>()
        .join(" ")
}
