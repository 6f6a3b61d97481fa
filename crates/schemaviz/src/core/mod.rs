//! Core types shared by the classifier, the engines and the renderer

mod config;
mod engine;
mod error;
mod format;
pub mod logging;
mod table_type;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use table_type::*;
