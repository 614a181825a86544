//! Editor settings
//!
//! The admin settings service resolves these and hands them to the editor
//! read-only. Locally they can also be loaded from
//! `~/.config/quire/settings.yaml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::editable::DEFAULT_HISTORY_DEPTH;

/// Feature toggles: a disabled feature rejects its commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub links: bool,
    pub images: bool,
    pub tables: bool,
    pub embeds: bool,
    pub markdown: bool,
    pub code_blocks: bool,
    pub lists: bool,
    pub colors: bool,
    pub autosave: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            links: true,
            images: true,
            tables: true,
            embeds: true,
            markdown: true,
            code_blocks: true,
            lists: true,
            colors: true,
            autosave: true,
        }
    }
}

/// Fully resolved editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of undo snapshots kept
    pub history_depth: usize,
    /// Debounce window for the local fallback autosave (0 disables it)
    pub autosave_interval_ms: u64,
    /// Words per minute used for the reading time estimate
    pub reading_speed_wpm: u32,
    /// Soft content limits reported through metrics
    pub max_words: Option<usize>,
    pub max_chars: Option<usize>,
    pub features: FeatureToggles,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
    /// MIME types accepted for image upload
    pub allowed_upload_types: Vec<String>,
    /// Hosts accepted for embeds (subdomains included)
    pub allowed_embed_providers: Vec<String>,
    pub max_table_rows: usize,
    pub max_table_cols: usize,
    /// Colors offered by the text color picker. Empty allows any color.
    pub color_palette: Vec<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            autosave_interval_ms: 1000,
            reading_speed_wpm: 200,
            max_words: None,
            max_chars: None,
            features: FeatureToggles::default(),
            max_upload_bytes: 5 * 1024 * 1024,
            allowed_upload_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
            allowed_embed_providers: vec![
                "youtube.com".to_string(),
                "youtu.be".to_string(),
                "vimeo.com".to_string(),
            ],
            max_table_rows: 20,
            max_table_cols: 10,
            color_palette: Vec::new(),
        }
    }
}

impl EditorSettings {
    /// Load settings from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::settings_file() else {
            tracing::debug!("No config directory available, using default settings");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("{:#}", e);
            Self::default()
        })
    }

    /// Load settings from a specific YAML file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings at {}", path.display()))?;
        let settings: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings at {}", path.display()))?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check if an upload MIME type is accepted
    pub fn allows_upload_type(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        self.allowed_upload_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&mime))
    }

    /// Check if an embed host belongs to an allowed provider
    pub fn allows_embed_host(&self, host: &str) -> bool {
        self.allowed_embed_providers.iter().any(|provider| {
            let provider = provider.to_ascii_lowercase();
            host == provider || host.ends_with(&format!(".{}", provider))
        })
    }

    /// Check if a color may be applied.
    ///
    /// With an empty palette any color is accepted; the sanitizer still
    /// filters the resulting style.
    pub fn allows_color(&self, color: &str) -> bool {
        self.color_palette.is_empty()
            || self
                .color_palette
                .iter()
                .any(|c| c.eq_ignore_ascii_case(color.trim()))
    }
}
