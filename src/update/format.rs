//! Selection tracking and active-format recomputation

use crate::commands::Cmd;
use crate::editable::{EditableSurface, Selection};
use crate::messages::{FormatMsg, SelectionMsg};
use crate::model::EditorModel;

/// Handle format messages
pub fn update_format<S: EditableSurface>(
    model: &mut EditorModel<S>,
    msg: FormatMsg,
) -> Option<Cmd> {
    match msg {
        FormatMsg::Refresh => {
            model.refresh_formats();
            None
        }
    }
}

/// Handle selection changes. Read-only with respect to content.
pub fn update_selection<S: EditableSurface>(
    model: &mut EditorModel<S>,
    msg: SelectionMsg,
) -> Option<Cmd> {
    let selection = match msg {
        SelectionMsg::Set(selection) => selection,
        SelectionMsg::SelectAll => Selection::new(0, model.surface.markup().len()),
    };
    model.surface.set_selection(selection);
    model.refresh_formats();
    None
}
