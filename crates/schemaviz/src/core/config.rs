//! Engine configuration

use std::path::{Path, PathBuf};

/// Settings used when probing rendering engines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Graphviz executable, resolved through `PATH` when not absolute
    pub dot_program: PathBuf,
    /// Whether the builtin engine may be used as a fallback
    pub builtin_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dot_program: PathBuf::from("dot"),
            builtin_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific Graphviz executable
    pub fn with_dot_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.dot_program = program.into();
        self
    }

    /// Enable or disable the builtin fallback engine
    pub fn with_builtin(mut self, enabled: bool) -> Self {
        self.builtin_enabled = enabled;
        self
    }

    pub fn dot_program(&self) -> &Path {
        &self.dot_program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.dot_program(), Path::new("dot"));
        assert!(config.builtin_enabled);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_dot_program("/opt/graphviz/bin/dot")
            .with_builtin(false);
        assert_eq!(config.dot_program(), Path::new("/opt/graphviz/bin/dot"));
        assert!(!config.builtin_enabled);
    }
}
