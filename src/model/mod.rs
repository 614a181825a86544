//! Editor model - the complete state of one editor instance
//!
//! Following the Elm Architecture, all of this state is mutated only through
//! [`crate::update::update`].

pub mod format;
pub mod metrics;

pub use format::{
    detect_active_formats, text_align, ActiveFormatSet, Alignment, BlockType, InlineFormat,
    ListKind,
};
pub use metrics::EditorMetrics;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::EditorSettings;
use crate::diagnostics::{EditorLog, LogEvent, TracingLog};
use crate::editable::{EditableSurface, MarkupSurface, SnapshotHistory};

/// Bookkeeping for reconciling external content with the surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Markup most recently accepted into the surface, from either side
    pub last_committed: Option<String>,
    /// Raw (unsanitized) external value most recently applied. Cleared by
    /// internal edits.
    pub last_external: Option<String>,
}

/// What the observer receives after every committed internal change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub markup: String,
    pub plain_text: String,
    pub word_count: usize,
}

/// An upload waiting for its collaborator to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    /// Caret offset when the upload started
    pub offset: usize,
    pub name: String,
}

/// In-flight uploads keyed by ticket
#[derive(Debug, Default)]
pub struct UploadState {
    next_ticket: u64,
    pending: HashMap<u64, PendingUpload>,
}

impl UploadState {
    /// Register an upload and return its ticket
    pub fn begin(&mut self, offset: usize, name: impl Into<String>) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.insert(
            ticket,
            PendingUpload {
                offset,
                name: name.into(),
            },
        );
        ticket
    }

    /// Remove and return a pending upload
    pub fn take(&mut self, ticket: u64) -> Option<PendingUpload> {
        self.pending.remove(&ticket)
    }

    pub fn is_pending(&self, ticket: u64) -> bool {
        self.pending.contains_key(&ticket)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// One editor: surface, history, derived state and collaborators
pub struct EditorModel<S: EditableSurface = MarkupSurface> {
    pub surface: S,
    pub history: SnapshotHistory,
    pub sync: SyncState,
    pub metrics: EditorMetrics,
    pub formats: ActiveFormatSet,
    /// Read-only admin settings
    pub settings: EditorSettings,
    pub uploads: UploadState,
    /// Bumped on every committed change; stale debounced work compares against it
    pub revision: u64,
    pub log: Arc<dyn EditorLog>,
}

impl EditorModel<MarkupSurface> {
    /// Create an editor over an empty in-memory surface
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_surface(MarkupSurface::new(), settings)
    }
}

impl<S: EditableSurface> EditorModel<S> {
    /// Create an editor over an existing surface. Content already on the
    /// surface becomes the first undo snapshot.
    pub fn with_surface(surface: S, settings: EditorSettings) -> Self {
        let mut history = SnapshotHistory::with_max_size(settings.history_depth);
        if !surface.markup().is_empty() {
            history.push(surface.markup().to_string());
        }
        let mut model = Self {
            surface,
            history,
            sync: SyncState::default(),
            metrics: EditorMetrics::default(),
            formats: ActiveFormatSet::default(),
            settings,
            uploads: UploadState::default(),
            revision: 0,
            log: Arc::new(TracingLog),
        };
        model.refresh_metrics();
        model.refresh_formats();
        model
    }

    /// Replace the log sink
    pub fn with_log(mut self, log: Arc<dyn EditorLog>) -> Self {
        self.log = log;
        self
    }

    pub fn markup(&self) -> &str {
        self.surface.markup()
    }

    pub fn plain_text(&self) -> String {
        self.surface.plain_text()
    }

    pub fn refresh_metrics(&mut self) {
        self.metrics = EditorMetrics::compute(&self.surface.plain_text(), &self.settings);
    }

    pub fn refresh_formats(&mut self) {
        self.formats = detect_active_formats(self.surface.markup(), self.surface.selection());
    }

    /// Report a refused or failed operation
    pub fn report(&self, event: LogEvent) {
        self.log.record(event);
    }

    pub fn content_change(&self) -> ContentChange {
        ContentChange {
            markup: self.surface.markup().to_string(),
            plain_text: self.surface.plain_text(),
            word_count: self.metrics.word_count,
        }
    }
}

impl<S: EditableSurface + fmt::Debug> fmt::Debug for EditorModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorModel")
            .field("surface", &self.surface)
            .field("history", &self.history)
            .field("sync", &self.sync)
            .field("metrics", &self.metrics)
            .field("formats", &self.formats)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
