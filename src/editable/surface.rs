//! The editable surface: one flat, mutable markup string plus a selection.
//!
//! [`EditableSurface`] is the seam between the editing core and whatever
//! actually hosts the content (a browser element, a test double).
//! [`MarkupSurface`] is the in-memory implementation.

use std::ops::Range;

use super::markup::{self, snap_offset};
use super::selection::Selection;
use crate::sanitize::escape_text;

/// A live, mutable markup region the user types into
pub trait EditableSurface {
    /// Current raw markup
    fn markup(&self) -> &str;

    /// Replace the whole content. The selection is clamped into the new markup.
    fn set_markup(&mut self, markup: String);

    /// Current selection (byte offsets into the markup)
    fn selection(&self) -> Selection;

    /// Move the selection. Offsets are snapped to valid insertion points.
    fn set_selection(&mut self, selection: Selection);

    /// Replace `range` with `replacement` and put the caret after it.
    /// Returns the offset just past the inserted markup.
    fn splice(&mut self, range: Range<usize>, replacement: &str) -> usize;

    /// Plain-text projection of the current markup
    fn plain_text(&self) -> String {
        markup::plain_text(self.markup())
    }

    /// Type text at the caret the way a keystroke would: the selection is
    /// replaced and the text is escaped.
    fn type_text(&mut self, text: &str) {
        let range = self.selection().range();
        self.splice(range, &escape_text(text));
    }

    /// Delete the selection, or the character before the caret
    fn delete_backward(&mut self) {
        let selection = self.selection();
        if !selection.is_empty() {
            self.splice(selection.range(), "");
            return;
        }
        if let Some(unit) = markup::previous_text_unit(self.markup(), selection.head) {
            self.splice(unit, "");
        }
    }
}

/// In-memory editable surface
#[derive(Debug, Clone, Default)]
pub struct MarkupSurface {
    markup: String,
    selection: Selection,
    /// Number of writes, for detecting spurious rewrites
    writes: u64,
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface with content and the caret at the end
    pub fn with_markup(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let end = markup.len();
        Self {
            markup,
            selection: Selection::collapsed(end),
            writes: 0,
        }
    }

    /// Number of times the content has been written
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn clamp_selection(&mut self) {
        let anchor = snap_offset(&self.markup, self.selection.anchor);
        let head = snap_offset(&self.markup, self.selection.head);
        self.selection = Selection::new(anchor, head);
    }
}

impl EditableSurface for MarkupSurface {
    fn markup(&self) -> &str {
        &self.markup
    }

    fn set_markup(&mut self, markup: String) {
        self.markup = markup;
        self.writes += 1;
        self.clamp_selection();
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.clamp_selection();
    }

    fn splice(&mut self, range: Range<usize>, replacement: &str) -> usize {
        let start = range.start.min(self.markup.len());
        let end = range.end.clamp(start, self.markup.len());
        self.markup.replace_range(start..end, replacement);
        self.writes += 1;

        let caret = start + replacement.len();
        self.selection = Selection::collapsed(caret);
        caret
    }
}
