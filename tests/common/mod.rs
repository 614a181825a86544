//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use quire::commands::Cmd;
use quire::config::EditorSettings;
use quire::diagnostics::{LogEvent, MemoryLog};
use quire::editable::{EditableSurface, MarkupSurface, Selection};
use quire::messages::{ContentMsg, Msg, SelectionMsg};
use quire::model::EditorModel;
use quire::update::update;

/// Settings used by most tests: defaults with autosave off
pub fn test_settings() -> EditorSettings {
    EditorSettings {
        autosave_interval_ms: 0,
        ..EditorSettings::default()
    }
}

/// Create a test model over `markup` with the caret at the end
pub fn test_model(markup: &str) -> EditorModel {
    test_model_with(markup, test_settings()).0
}

/// Create a test model with custom settings and a recording log sink
pub fn test_model_with(markup: &str, settings: EditorSettings) -> (EditorModel, Arc<MemoryLog>) {
    let log = MemoryLog::new();
    let model = EditorModel::with_surface(MarkupSurface::with_markup(markup), settings)
        .with_log(log.clone());
    (model, log)
}

/// Model that was loaded through the synchronizer, like a host would
pub fn loaded_model(markup: &str) -> (EditorModel, Arc<MemoryLog>) {
    let (mut model, log) = test_model_with("", test_settings());
    update(&mut model, Msg::external(markup));
    (model, log)
}

pub fn surface_markup(model: &EditorModel) -> &str {
    model.surface.markup()
}

/// Select the first occurrence of `needle` in the markup
pub fn select(model: &mut EditorModel, needle: &str) {
    let start = model
        .markup()
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found in {:?}", needle, model.markup()));
    update(
        model,
        Msg::Selection(SelectionMsg::Set(Selection::new(start, start + needle.len()))),
    );
}

/// Put the caret right after the first occurrence of `needle`
pub fn caret_after(model: &mut EditorModel, needle: &str) {
    let start = model
        .markup()
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found in {:?}", needle, model.markup()));
    update(
        model,
        Msg::Selection(SelectionMsg::Set(Selection::collapsed(start + needle.len()))),
    );
}

/// Run a named command, then apply the deferred format refresh like the
/// runtime would on its next turn
pub fn execute(model: &mut EditorModel, name: &str, value: Option<&str>) -> Option<Cmd> {
    let cmd = update(model, Msg::execute(name, value));
    model.refresh_formats();
    cmd
}

/// Type into the surface and commit it as an internal edit
pub fn type_and_commit(model: &mut EditorModel, text: &str) -> Option<Cmd> {
    model.surface.type_text(text);
    update(model, Msg::Content(ContentMsg::InternalEdit))
}

pub fn warnings(log: &MemoryLog) -> Vec<LogEvent> {
    log.events().into_iter().filter(|e| !e.is_error()).collect()
}
