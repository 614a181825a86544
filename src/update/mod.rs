//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. None of them
//! fail: refused operations are reported to the model's log sink and become
//! no-ops.

mod autosave;
mod command;
mod content;
mod format;
mod history;
pub mod mutate;
mod upload;

use crate::commands::Cmd;
use crate::editable::EditableSurface;
use crate::messages::Msg;
use crate::model::EditorModel;

#[cfg(debug_assertions)]
use crate::tracing::SurfaceSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use autosave::{schedule_autosave, update_autosave};
pub use command::{execute_named, update_command};
pub use content::{commit, update_content};
pub use format::{update_format, update_selection};
pub use history::update_history;
pub use upload::{begin_upload, update_upload};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update<S: EditableSurface>(model: &mut EditorModel<S>, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner<S: EditableSurface>(model: &mut EditorModel<S>, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Content(m) => content::update_content(model, m),
        Msg::Command(cmd) => command::update_command(model, cmd),
        Msg::Execute { name, value } => command::execute_named(model, &name, value.as_deref()),
        Msg::History(m) => history::update_history(model, m),
        Msg::Selection(m) => format::update_selection(model, m),
        Msg::Format(m) => format::update_format(model, m),
        Msg::Upload(m) => upload::update_upload(model, m),
        Msg::Autosave(m) => autosave::update_autosave(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after surface state and logs the diff.
/// Format refreshes are frequent and skipped.
#[cfg(debug_assertions)]
fn update_traced<S: EditableSurface>(model: &mut EditorModel<S>, msg: Msg) -> Option<Cmd> {
    use crate::messages::FormatMsg;

    let is_noisy = matches!(&msg, Msg::Format(FormatMsg::Refresh));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = SurfaceSnapshot::from_model(model);
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    let after = SurfaceSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "surface", %diff, "state changed");
    }

    debug_assert!(
        model.history.is_empty() || model.history.cursor() < model.history.len(),
        "history cursor out of bounds after {}",
        msg_name
    );

    result
}

/// Get a display name for a message type
///
/// Payloads that carry markup are reduced to their length.
/// Example outputs:
/// - `Content::External(42 bytes)`
/// - `Execute(formatBlock, Some("h2"))`
/// - `History::Undo`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::ContentMsg;

    match msg {
        Msg::Content(ContentMsg::External(markup)) => {
            format!("Content::External({} bytes)", markup.len())
        }
        Msg::Content(m) => format!("Content::{:?}", m),
        Msg::Command(cmd) => format!("Command::{}", cmd.name()),
        Msg::Execute { name, value } => format!("Execute({}, {:?})", name, value),
        Msg::History(m) => format!("History::{:?}", m),
        Msg::Selection(m) => format!("Selection::{:?}", m),
        Msg::Format(m) => format!("Format::{:?}", m),
        Msg::Upload(m) => format!("Upload::{:?}", m),
        Msg::Autosave(m) => format!("Autosave::{:?}", m),
    }
}
