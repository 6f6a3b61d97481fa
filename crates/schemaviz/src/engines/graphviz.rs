//! Graphviz `dot` executable engine
//!
//! The preferred engine: full Graphviz layout and every output format, as
//! long as the executable can be found.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

use tracing::{debug, trace};

use crate::core::{CapabilityUnavailable, Engine, EngineError, EngineProbe, GraphFormat};

pub const GRAPHVIZ_ENGINE: &str = "graphviz-dot";

/// Renders by piping DOT source into the Graphviz executable
#[derive(Debug, Clone)]
pub struct GraphvizCommandEngine {
    program: PathBuf,
}

impl GraphvizCommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Engine for GraphvizCommandEngine {
    fn name(&self) -> &str {
        GRAPHVIZ_ENGINE
    }

    fn render(
        &self,
        source: &str,
        format: GraphFormat,
        output: &Path,
    ) -> Result<(), EngineError> {
        debug!(program = %self.program.display(), format = %format, "Running Graphviz");

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.token()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program_name(),
                source,
            })?;

        // stdin is fed from its own thread while stderr drains here
        let stdin = child.stdin.take();
        let (written, result) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_source(stdin, source));
            let result = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, result)
        });

        let result = result?;
        if !result.status.success() {
            return Err(EngineError::ExitStatus {
                program: self.program_name(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        written?;

        trace!(output = %output.display(), "Graphviz finished");
        Ok(())
    }
}

/// Write the whole source and close the pipe
///
/// A closed pipe means dot exited before reading everything; its exit status
/// and stderr say why, so the write error itself is dropped.
fn write_source(stdin: Option<ChildStdin>, source: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(source.as_bytes()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Loads [`GraphvizCommandEngine`] when `<program> -V` runs successfully
#[derive(Debug, Clone)]
pub struct GraphvizCommandProbe {
    program: PathBuf,
}

impl GraphvizCommandProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GraphvizCommandProbe {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl EngineProbe for GraphvizCommandProbe {
    fn name(&self) -> &str {
        GRAPHVIZ_ENGINE
    }

    fn probe(&self) -> Result<Box<dyn Engine>, CapabilityUnavailable> {
        let status = Command::new(&self.program)
            .arg("-V")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                CapabilityUnavailable::new(
                    GRAPHVIZ_ENGINE,
                    format!("cannot run {}: {}", self.program.display(), e),
                )
            })?;

        if !status.success() {
            return Err(CapabilityUnavailable::new(
                GRAPHVIZ_ENGINE,
                format!("{} -V exited with {}", self.program.display(), status),
            ));
        }

        Ok(Box::new(GraphvizCommandEngine::new(self.program.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let probe = GraphvizCommandProbe::new("/nonexistent/schemaviz/dot");
        let missing = probe.probe().err().expect("program should be missing");
        assert_eq!(missing.engine, GRAPHVIZ_ENGINE);
        assert!(missing.reason.contains("/nonexistent/schemaviz/dot"));
    }

    #[test]
    fn test_render_with_missing_program_is_spawn_error() {
        let engine = GraphvizCommandEngine::new("/nonexistent/schemaviz/dot");
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.svg");
        let err = engine
            .render("digraph { a -> b }", GraphFormat::Svg, &output)
            .unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_default_probe_name() {
        let probe = GraphvizCommandProbe::default();
        assert_eq!(probe.name(), "graphviz-dot");
    }

    #[cfg(unix)]
    mod stub_program {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        /// Shell script standing in for the dot executable
        fn stub_dot(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("dot");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn large_source() -> String {
            "digraph { a -> b }\n".repeat(100_000)
        }

        #[test]
        fn test_render_passes_format_and_output() {
            let dir = tempfile::tempdir().unwrap();
            let args = dir.path().join("args");
            let program = stub_dot(
                dir.path(),
                &format!("echo \"$@\" > '{}'\ncat > \"$3\"", args.display()),
            );
            let output = dir.path().join("schema.png");

            GraphvizCommandEngine::new(program)
                .render("digraph { a -> b }", GraphFormat::Png, &output)
                .unwrap();

            let recorded = fs::read_to_string(&args).unwrap();
            assert_eq!(recorded.trim(), format!("-Tpng -o {}", output.display()));
            assert_eq!(fs::read_to_string(&output).unwrap(), "digraph { a -> b }");
        }

        #[test]
        fn test_nonzero_exit_reports_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let program = stub_dot(
                dir.path(),
                "cat > /dev/null\necho 'Error: syntax error' >&2\nexit 2",
            );
            let output = dir.path().join("schema.svg");

            let err = GraphvizCommandEngine::new(program)
                .render("digraph { a -> }", GraphFormat::Svg, &output)
                .unwrap_err();
            match err {
                EngineError::ExitStatus { status, stderr, .. } => {
                    assert_eq!(status.code(), Some(2));
                    assert_eq!(stderr, "Error: syntax error");
                }
                other => panic!("Expected exit status error, got {:?}", other),
            }
        }

        #[test]
        fn test_early_exit_on_large_source_reports_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let program = stub_dot(dir.path(), "echo 'Error: syntax error' >&2\nexit 1");
            let output = dir.path().join("schema.svg");

            let err = GraphvizCommandEngine::new(program)
                .render(&large_source(), GraphFormat::Svg, &output)
                .unwrap_err();
            match err {
                EngineError::ExitStatus { stderr, .. } => {
                    assert!(stderr.contains("syntax error"));
                }
                other => panic!("Expected exit status error, got {:?}", other),
            }
        }

        #[test]
        fn test_large_stderr_does_not_block_stdin() {
            let dir = tempfile::tempdir().unwrap();
            let program = stub_dot(
                dir.path(),
                "head -c 300000 /dev/zero | tr '\\0' w >&2\ncat > /dev/null",
            );
            let output = dir.path().join("schema.svg");

            GraphvizCommandEngine::new(program)
                .render(&large_source(), GraphFormat::Svg, &output)
                .unwrap();
        }

        #[test]
        fn test_probe_reports_failing_version_check() {
            let dir = tempfile::tempdir().unwrap();
            let program = stub_dot(dir.path(), "exit 3");

            let missing = GraphvizCommandProbe::new(program).probe().err().unwrap();
            assert_eq!(missing.engine, GRAPHVIZ_ENGINE);
            assert!(missing.reason.contains("-V exited with"));
        }

        #[test]
        fn test_probe_loads_engine_when_version_check_passes() {
            let dir = tempfile::tempdir().unwrap();
            let program = stub_dot(dir.path(), "echo 'dot - graphviz version 9.0.0' >&2");

            let engine = GraphvizCommandProbe::new(program).probe().unwrap();
            assert_eq!(engine.name(), GRAPHVIZ_ENGINE);
        }
    }
}
