//! The editable surface and the primitives that operate on it.
//!
//! # Architecture
//!
//! - [`EditableSurface`]: trait abstracting over whatever hosts the live markup
//! - [`MarkupSurface`]: in-memory surface (markup string + selection)
//! - [`Selection`]: anchor/head byte offsets into the markup
//! - [`SnapshotHistory`]: bounded, non-branching undo/redo over full snapshots
//! - [`markup`]: tag scanner, enclosing-element lookup, plain-text projection
//!
//! # Example
//!
//! ```
//! use quire::editable::{EditableSurface, MarkupSurface, Selection, SnapshotHistory};
//!
//! let mut surface = MarkupSurface::with_markup("<p>hello</p>");
//! let mut history = SnapshotHistory::with_max_size(10);
//! history.push(surface.markup());
//!
//! surface.set_selection(Selection::collapsed(8));
//! surface.type_text("!");
//! history.push(surface.markup());
//!
//! assert_eq!(history.undo().map(|s| s.markup()), Some("<p>hello</p>"));
//! ```

mod history;
pub mod markup;
mod selection;
mod surface;

pub use history::{HistorySnapshot, SnapshotHistory, DEFAULT_HISTORY_DEPTH};
pub use selection::Selection;
pub use surface::{EditableSurface, MarkupSurface};
