//! quire - sanitizing rich-text editing core
//!
//! This crate provides an allowlist markup sanitizer and the model, update
//! functions and runtime of a rich-text editor implementing the Elm
//! Architecture pattern.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod diagnostics;
pub mod editable;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod sanitize;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::{Cmd, EditorCommand};
pub use config::EditorSettings;
pub use messages::Msg;
pub use model::EditorModel;
pub use runtime::Runtime;
pub use sanitize::sanitize;
pub use update::update;
