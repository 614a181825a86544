//! Content synchronization
//!
//! Reconciles the host's "current content" value with the live surface.
//! External values are untrusted and sanitized before they are written;
//! internal edits are accepted raw. Both record `last_committed` so the host
//! echoing our own change back is recognized and ignored.

use crate::commands::Cmd;
use crate::editable::EditableSurface;
use crate::messages::ContentMsg;
use crate::model::EditorModel;
use crate::sanitize::sanitize;

use super::autosave::schedule_autosave;

/// Handle content lifecycle messages
pub fn update_content<S: EditableSurface>(
    model: &mut EditorModel<S>,
    msg: ContentMsg,
) -> Option<Cmd> {
    match msg {
        ContentMsg::External(incoming) => apply_external(model, incoming),
        ContentMsg::InternalEdit => commit(model),
    }
}

fn apply_external<S: EditableSurface>(
    model: &mut EditorModel<S>,
    incoming: String,
) -> Option<Cmd> {
    // Raw string equality. Semantically equal markup with a different
    // serialization counts as a change.
    let echoes_commit = model.sync.last_committed.as_deref() == Some(incoming.as_str());
    let repeats_external = model.sync.last_external.as_deref() == Some(incoming.as_str());
    if echoes_commit || repeats_external {
        tracing::trace!(
            echoes_commit,
            repeats_external,
            "external content unchanged, skipping"
        );
        return None;
    }

    let safe = sanitize(&incoming);
    if safe != incoming {
        model.log.debug(&format!(
            "sanitized external content ({} -> {} bytes)",
            incoming.len(),
            safe.len()
        ));
    }

    // Leave the surface alone when it already shows this content so the
    // caret survives
    if model.surface.markup() != safe {
        model.surface.set_markup(safe.clone());
    }

    if model.history.is_empty() {
        model.history.push(safe.clone());
    }
    model.sync.last_committed = Some(safe);
    model.sync.last_external = Some(incoming);
    model.refresh_metrics();

    Some(Cmd::RefreshFormats)
}

/// Accept the surface's current raw markup as a committed change.
///
/// Pushes a history snapshot, bumps the revision, recomputes metrics and
/// returns the observer notification plus the deferred format refresh and
/// debounced autosave. Returns `None` if nothing changed since the last
/// commit.
pub fn commit<S: EditableSurface>(model: &mut EditorModel<S>) -> Option<Cmd> {
    let markup = model.surface.markup().to_string();
    if model.sync.last_committed.as_deref() == Some(markup.as_str()) {
        return None;
    }

    if model.history.is_empty() {
        // First change in a never-loaded editor: keep the empty state undoable
        let baseline = model.sync.last_committed.clone().unwrap_or_default();
        model.history.push(baseline);
    }
    model.history.push(markup.clone());

    model.sync.last_committed = Some(markup);
    model.sync.last_external = None;
    model.revision += 1;
    model.refresh_metrics();

    Some(after_change(model))
}

/// Side effects shared by every committed change (edits, commands, undo)
pub(super) fn after_change<S: EditableSurface>(model: &mut EditorModel<S>) -> Cmd {
    Cmd::batch(vec![
        Cmd::NotifyChange(model.content_change()),
        Cmd::RefreshFormats,
        schedule_autosave(model).unwrap_or_default(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorSettings;
    use crate::diagnostics::MemoryLog;
    use crate::editable::Selection;

    fn model() -> EditorModel {
        EditorModel::new(EditorSettings::default())
    }

    #[test]
    fn test_external_is_sanitized_and_seeds_history() {
        let mut model = model();
        let cmd = update_content(
            &mut model,
            ContentMsg::External(r#"<p onclick="x()">Hi</p>"#.to_string()),
        );
        assert_eq!(cmd, Some(Cmd::RefreshFormats));
        assert_eq!(model.markup(), "<p>Hi</p>");
        assert_eq!(model.history.len(), 1);
        assert_eq!(model.sync.last_committed.as_deref(), Some("<p>Hi</p>"));
        assert_eq!(model.metrics.word_count, 1);
    }

    #[test]
    fn test_echo_of_committed_content_is_ignored() {
        let mut model = model();
        update_content(&mut model, ContentMsg::External("<p>a</p>".to_string()));
        let writes = model.surface.writes();

        let cmd = update_content(&mut model, ContentMsg::External("<p>a</p>".to_string()));
        assert_eq!(cmd, None);
        assert_eq!(model.surface.writes(), writes);
    }

    #[test]
    fn test_repeated_unsafe_external_is_written_once() {
        let mut model = model();
        let raw = "<p>a<script>x</script></p>".to_string();
        update_content(&mut model, ContentMsg::External(raw.clone()));
        let writes = model.surface.writes();

        assert_eq!(update_content(&mut model, ContentMsg::External(raw)), None);
        assert_eq!(model.surface.writes(), writes);
    }

    #[test]
    fn test_later_external_does_not_push_history() {
        let mut model = model();
        update_content(&mut model, ContentMsg::External("<p>a</p>".to_string()));
        update_content(&mut model, ContentMsg::External("<p>b</p>".to_string()));
        assert_eq!(model.markup(), "<p>b</p>");
        assert_eq!(model.history.len(), 1);
    }

    #[test]
    fn test_internal_edit_commits_raw_markup() {
        let mut model = model();
        update_content(&mut model, ContentMsg::External("<p>a</p>".to_string()));

        model.surface.set_selection(Selection::collapsed(4));
        model.surface.type_text(" b");
        let cmd = update_content(&mut model, ContentMsg::InternalEdit).unwrap();

        assert_eq!(model.history.len(), 2);
        assert_eq!(model.revision, 1);
        assert_eq!(model.sync.last_committed.as_deref(), Some("<p>a b</p>"));
        assert!(cmd.any(&|c| matches!(
            c,
            Cmd::NotifyChange(change) if change.word_count == 2 && change.plain_text == "a b"
        )));
        assert!(cmd.any(&|c| matches!(c, Cmd::RefreshFormats)));
        assert!(cmd.any(&|c| matches!(c, Cmd::DebouncedAutosave { revision: 1, .. })));
    }

    #[test]
    fn test_unchanged_internal_edit_is_noop() {
        let mut model = model();
        update_content(&mut model, ContentMsg::External("<p>a</p>".to_string()));
        assert_eq!(update_content(&mut model, ContentMsg::InternalEdit), None);
        assert_eq!(model.history.len(), 1);
    }

    #[test]
    fn test_first_edit_without_load_keeps_empty_baseline() {
        let mut model = model();
        model.surface.type_text("hi");
        update_content(&mut model, ContentMsg::InternalEdit);
        assert_eq!(model.history.len(), 2);
        assert_eq!(model.history.undo().map(|s| s.markup()), Some(""));
    }

    #[test]
    fn test_same_raw_external_after_edit_is_reapplied() {
        let mut model = model();
        let raw = "<p>a<script>x</script></p>".to_string();
        update_content(&mut model, ContentMsg::External(raw.clone()));

        model.surface.type_text("!");
        update_content(&mut model, ContentMsg::InternalEdit);

        assert!(update_content(&mut model, ContentMsg::External(raw)).is_some());
        assert_eq!(model.markup(), "<p>a</p>");
    }

    #[test]
    fn test_sanitizer_rewrite_is_reported_as_detail() {
        let log = MemoryLog::new();
        let mut model = model().with_log(log.clone());
        update_content(&mut model, ContentMsg::External("<p>clean</p>".to_string()));
        assert!(log.details().is_empty());

        update_content(
            &mut model,
            ContentMsg::External("<p>a<script>x</script></p>".to_string()),
        );
        let details = log.details();
        assert_eq!(details.len(), 1);
        assert!(details[0].starts_with("sanitized external content"));
        assert!(log.is_empty());
    }
}
