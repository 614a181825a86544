//! Message types for the Elm-style architecture
//!
//! Everything that can happen to an editor is expressed as a [`Msg`] and
//! handled by [`crate::update::update`].

use crate::commands::EditorCommand;
use crate::editable::Selection;
use crate::runtime::UploadError;

/// Content lifecycle messages (the synchronizer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMsg {
    /// The host supplied a new "current content" value (untrusted)
    External(String),
    /// The surface was mutated directly by typing; commit its raw markup
    InternalEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMsg {
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMsg {
    /// Caret or selection moved
    Set(Selection),
    SelectAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMsg {
    /// Recompute the active format set (deferred after mutations)
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadMsg {
    /// The upload collaborator answered
    Completed {
        ticket: u64,
        result: Result<String, UploadError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveMsg {
    /// Debounce window elapsed for the edit at `revision`
    Ready { revision: u64 },
}

/// Top-level message
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Content(ContentMsg),
    /// Typed toolbar intent
    Command(EditorCommand),
    /// Named toolbar intent, e.g. `("formatBlock", Some("h2"))`
    Execute {
        name: String,
        value: Option<String>,
    },
    History(HistoryMsg),
    Selection(SelectionMsg),
    Format(FormatMsg),
    Upload(UploadMsg),
    Autosave(AutosaveMsg),
}

impl Msg {
    pub fn external(markup: impl Into<String>) -> Self {
        Msg::Content(ContentMsg::External(markup.into()))
    }

    pub fn execute(name: impl Into<String>, value: Option<&str>) -> Self {
        Msg::Execute {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}
