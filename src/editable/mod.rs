//! Text storage and mutation history for edit sessions.
//!
//! # Architecture
//!
//! - [`TextBuffer`] / [`TextBufferMut`]: Traits abstracting over buffer implementations
//! - [`RopeBuffer`]: Buffer for multi-line documents (backed by `ropey::Rope`)
//! - [`Edit`] / [`EditEvent`]: A requested mutation and the event describing it once applied
//! - [`MutationLog`]: Bounded undo/redo stacks of toggleable [`MutationEntry`] values
//!
//! # Example
//!
//! ```ignore
//! use quire::editable::{apply_edit, Edit, MutationLog, RopeBuffer};
//!
//! let mut buffer = RopeBuffer::from_text("hello");
//! let mut log = MutationLog::new();
//!
//! let event = apply_edit(&mut buffer, Edit::insert(5, " world"))?;
//! log.observe(&event);
//!
//! assert!(log.can_undo());
//! ```

mod buffer;
mod edit;
mod history;

// Re-export main types
pub use buffer::{RopeBuffer, TextBuffer, TextBufferMut};
pub use edit::{apply_edit, Edit, EditEvent};
pub use history::{HistoryNotice, MutationEntry, MutationKind, MutationLog, DEFAULT_CAPACITY};
