//! Configuration tests
//!
//! Tests for config paths and settings loading.

use std::io::Write;

use quire::config::{EditorSettings, FeatureToggles};
use quire::config_paths;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("quire"));
    }
}

#[test]
fn test_files_live_under_config_dir() {
    let Some(config) = config_paths::config_dir() else {
        return;
    };
    let settings = config_paths::settings_file().unwrap();
    assert!(settings.starts_with(&config));
    assert!(settings.to_string_lossy().ends_with("settings.yaml"));
    assert!(config_paths::autosave_file().unwrap().starts_with(&config));
    assert!(config_paths::logs_dir().unwrap().starts_with(&config));
}

// ========================================================================
// Settings Tests
// ========================================================================

fn write_settings(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_partial_settings_fill_defaults() {
    let file = write_settings(
        "history_depth: 10\nfeatures:\n  tables: false\nallowed_embed_providers: [example.org]\n",
    );
    let settings = EditorSettings::load_from(file.path()).unwrap();

    assert_eq!(settings.history_depth, 10);
    assert!(!settings.features.tables);
    assert!(settings.features.links);
    assert_eq!(settings.reading_speed_wpm, 200);
    assert!(settings.allows_embed_host("video.example.org"));
    assert!(!settings.allows_embed_host("youtube.com"));
}

#[test]
fn test_invalid_settings_error_names_file() {
    let file = write_settings("history_depth: [not, a, number]\n");
    let err = EditorSettings::load_from(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains(&file.path().display().to_string()));
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(EditorSettings::load_from(&dir.path().join("nope.yaml")).is_err());
}

#[test]
fn test_settings_round_trip_through_yaml() {
    let settings = EditorSettings {
        max_words: Some(500),
        color_palette: vec!["#000000".to_string(), "#ff0000".to_string()],
        features: FeatureToggles {
            embeds: false,
            ..FeatureToggles::default()
        },
        ..EditorSettings::default()
    };
    let yaml = serde_yaml::to_string(&settings).unwrap();
    let file = write_settings(&yaml);
    let loaded = EditorSettings::load_from(file.path()).unwrap();

    assert_eq!(loaded.max_words, Some(500));
    assert!(!loaded.features.embeds);
    assert!(loaded.allows_color("#FF0000"));
    assert!(!loaded.allows_color("#00ff00"));
}

#[test]
fn test_upload_type_matching() {
    let settings = EditorSettings::default();
    assert!(settings.allows_upload_type("image/jpeg"));
    assert!(settings.allows_upload_type(" Image/WebP "));
    assert!(!settings.allows_upload_type("image/svg+xml"));
    assert!(!settings.allows_upload_type("text/html"));
}
