//! Tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! content synchronization, history, and command execution.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=message=debug,surface=debug` - scoped filtering
//! - `RUST_LOG=quire::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/quire/logs/quire.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::{EditableSurface, Selection};
use crate::model::EditorModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`.
/// File logging writes to `~/.config/quire/logs/quire.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG. Stdout carries command output.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "quire.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A host may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of surface state for diffing around an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub markup_len: usize,
    pub selection: Selection,
    pub revision: u64,
    pub history_len: usize,
    pub history_cursor: usize,
}

impl SurfaceSnapshot {
    pub fn from_model<S: EditableSurface>(model: &EditorModel<S>) -> Self {
        Self {
            markup_len: model.surface.markup().len(),
            selection: model.surface.selection(),
            revision: model.revision,
            history_len: model.history.len(),
            history_cursor: model.history.cursor(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SurfaceSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.markup_len != other.markup_len {
            changes.push(format!(
                "markup: {} → {} bytes",
                self.markup_len, other.markup_len
            ));
        }
        if self.selection != other.selection {
            changes.push(format!(
                "selection: {}..{} → {}..{}",
                self.selection.anchor,
                self.selection.head,
                other.selection.anchor,
                other.selection.head
            ));
        }
        if self.revision != other.revision {
            changes.push(format!("revision: {} → {}", self.revision, other.revision));
        }
        if self.history_len != other.history_len || self.history_cursor != other.history_cursor
        {
            changes.push(format!(
                "history: {}@{} → {}@{}",
                self.history_len, self.history_cursor, other.history_len, other.history_cursor
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_reports_changes() {
        let before = SurfaceSnapshot {
            markup_len: 0,
            selection: Selection::collapsed(0),
            revision: 0,
            history_len: 0,
            history_cursor: 0,
        };
        assert_eq!(before.diff(&before.clone()), None);

        let after = SurfaceSnapshot {
            markup_len: 8,
            revision: 1,
            ..before.clone()
        };
        assert_eq!(
            before.diff(&after).as_deref(),
            Some("markup: 0 → 8 bytes; revision: 0 → 1")
        );
    }
}
