//! Local fallback store for unsaved drafts

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("fallback store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fallback store quota exceeded ({size} bytes, limit {limit})")]
    Quota { size: usize, limit: usize },
    #[error("no fallback location available")]
    Unavailable,
}

/// Best-effort draft storage. Callers swallow every error.
pub trait FallbackStore: Send + Sync {
    fn save(&self, markup: &str) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Draft kept in a single file
#[derive(Debug, Clone)]
pub struct FileFallbackStore {
    path: PathBuf,
}

impl FileFallbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.config/quire/autosave.html`
    pub fn default_location() -> Result<Self, StoreError> {
        crate::config_paths::autosave_file()
            .map(Self::new)
            .ok_or(StoreError::Unavailable)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FallbackStore for FileFallbackStore {
    fn save(&self, markup: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, markup)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(markup) => Ok(Some(markup)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store with an optional size quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    draft: Mutex<Option<String>>,
    limit: Option<usize>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Pre-populate a draft
    pub fn with_draft(markup: impl Into<String>) -> Self {
        Self {
            draft: Mutex::new(Some(markup.into())),
            ..Self::default()
        }
    }

    pub fn draft(&self) -> Option<String> {
        self.draft.lock().ok().and_then(|d| d.clone())
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl FallbackStore for MemoryStore {
    fn save(&self, markup: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.limit {
            if markup.len() > limit {
                return Err(StoreError::Quota {
                    size: markup.len(),
                    limit,
                });
            }
        }
        if let Ok(mut draft) = self.draft.lock() {
            *draft = Some(markup.to_string());
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.draft())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if let Ok(mut draft) = self.draft.lock() {
            *draft = None;
        }
        Ok(())
    }
}

// Lets a runtime share a store with the test that inspects it
impl<T: FallbackStore + ?Sized> FallbackStore for std::sync::Arc<T> {
    fn save(&self, markup: &str) -> Result<(), StoreError> {
        (**self).save(markup)
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
