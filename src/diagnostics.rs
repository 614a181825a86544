//! Pluggable sink for editor warnings and errors.
//!
//! The model holds an `Arc<dyn EditorLog>` so hosts and tests can swap the
//! sink per editor instance instead of through process-wide state.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Something the editor refused to do, or failed to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A link/source URL used a dangerous pseudo-protocol
    BlockedUrl { url: String },
    /// Upload rejected before it started
    DisallowedUpload {
        name: String,
        mime: String,
        size: u64,
    },
    /// Embed URL host is not an allowed provider
    DisallowedEmbed { url: String },
    /// Command name not recognized, or its value was malformed
    UnsupportedCommand { name: String },
    /// Command belongs to a disabled feature
    FeatureDisabled { command: String },
    /// Numeric bound exceeded (table rows/cols, palette)
    LimitExceeded { command: String, detail: String },
    /// Upload collaborator failed
    UploadFailed { ticket: u64, reason: String },
}

impl LogEvent {
    /// Errors are upstream failures; everything else is a warning
    pub fn is_error(&self) -> bool {
        matches!(self, LogEvent::UploadFailed { .. })
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::BlockedUrl { url } => write!(f, "blocked dangerous URL {:?}", url),
            LogEvent::DisallowedUpload { name, mime, size } => write!(
                f,
                "upload {:?} rejected (type {}, {} bytes)",
                name, mime, size
            ),
            LogEvent::DisallowedEmbed { url } => {
                write!(f, "embed provider not allowed for {:?}", url)
            }
            LogEvent::UnsupportedCommand { name } => write!(f, "unsupported command {:?}", name),
            LogEvent::FeatureDisabled { command } => {
                write!(f, "command {:?} belongs to a disabled feature", command)
            }
            LogEvent::LimitExceeded { command, detail } => {
                write!(f, "command {:?} exceeds limit: {}", command, detail)
            }
            LogEvent::UploadFailed { ticket, reason } => {
                write!(f, "upload #{} failed: {}", ticket, reason)
            }
        }
    }
}

/// Sink for editor diagnostics
pub trait EditorLog: Send + Sync {
    fn record(&self, event: LogEvent);

    /// Verbose detail (sanitizer rewrites, upload and autosave progress).
    /// Sinks that only care about warnings and errors ignore it.
    fn debug(&self, _message: &str) {}
}

/// Default sink: forwards to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl EditorLog for TracingLog {
    fn record(&self, event: LogEvent) {
        if event.is_error() {
            tracing::error!(target: "quire::editor", "{}", event);
        } else {
            tracing::warn!(target: "quire::editor", "{}", event);
        }
    }

    fn debug(&self, message: &str) {
        // Verbose output is a development aid only
        if cfg!(debug_assertions) {
            tracing::debug!(target: "quire::editor", "{}", message);
        }
    }
}

/// Sink that keeps every event and detail message in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<LogEvent>>,
    details: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copy of all recorded events
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    /// Copy of all verbose detail messages
    pub fn details(&self) -> Vec<String> {
        self.details.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

impl EditorLog for MemoryLog {
    fn record(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn debug(&self, message: &str) {
        if let Ok(mut details) = self.details.lock() {
            details.push(message.to_string());
        }
    }
}
