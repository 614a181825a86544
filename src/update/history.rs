//! Undo/redo handlers
//!
//! Restoring a snapshot replaces the whole surface. It counts as a committed
//! change for the observer and autosave, but never pushes to history.

use crate::commands::Cmd;
use crate::editable::EditableSurface;
use crate::messages::HistoryMsg;
use crate::model::EditorModel;

use super::content::after_change;

/// Handle undo/redo
pub fn update_history<S: EditableSurface>(
    model: &mut EditorModel<S>,
    msg: HistoryMsg,
) -> Option<Cmd> {
    let snapshot = match msg {
        HistoryMsg::Undo => model.history.undo(),
        HistoryMsg::Redo => model.history.redo(),
    };
    let Some(markup) = snapshot.map(|s| s.markup().to_string()) else {
        tracing::trace!("{:?}: nothing to restore", msg);
        return None;
    };

    model.surface.set_markup(markup.clone());
    model.sync.last_committed = Some(markup);
    model.sync.last_external = None;
    model.revision += 1;
    model.refresh_metrics();

    Some(after_change(model))
}
