//! Rendering engines
//!
//! Engines are listed in preference order by [`default_probes`]: Graphviz
//! first for full fidelity, the builtin engine second so diagrams still come
//! out on machines without Graphviz.

pub mod builtin;
pub mod graphviz;

pub use builtin::{BuiltinEngine, BuiltinProbe, BUILTIN_ENGINE};
pub use graphviz::{GraphvizCommandEngine, GraphvizCommandProbe, GRAPHVIZ_ENGINE};

use crate::core::{EngineConfig, EngineProbe};

/// Engine probes in preference order for the given configuration
pub fn default_probes(config: &EngineConfig) -> Vec<Box<dyn EngineProbe>> {
    vec![
        Box::new(GraphvizCommandProbe::new(config.dot_program.clone())),
        Box::new(BuiltinProbe::new(config.builtin_enabled)),
    ]
}
