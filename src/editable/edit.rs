//! Primitive edits and the events a buffer reports after applying them.
//!
//! Every consumer of buffer mutations (the history log, the dirty-line
//! tracker, suspect marks) is fed the same `EditEvent`, in the order the
//! buffer applied the edits.

use anyhow::{bail, Result};

use super::buffer::TextBufferMut;

/// A primitive mutation requested against a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert `text` at character `offset`
    Insert { offset: usize, text: String },
    /// Delete `len` characters starting at character `offset`
    Delete { offset: usize, len: usize },
}

impl Edit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Edit::Insert {
            offset,
            text: text.into(),
        }
    }

    pub fn delete(offset: usize, len: usize) -> Self {
        Edit::Delete { offset, len }
    }

    /// True if applying this edit would not change the buffer
    pub fn is_noop(&self) -> bool {
        match self {
            Edit::Insert { text, .. } => text.is_empty(),
            Edit::Delete { len, .. } => *len == 0,
        }
    }
}

/// A mutation that has already taken effect in the buffer.
///
/// Line numbers are those of the affected range: for an insertion, the line
/// the insertion began on and the line its last character landed on; for an
/// erase, the lines the removed range spanned before it was removed. The end
/// line is derived from the change in line count, so a `\r\n` pair that is
/// split or joined by the edit counts as the buffer counts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    Inserted {
        offset: usize,
        text: String,
        start_line: usize,
        end_line: usize,
    },
    Erased {
        offset: usize,
        text: String,
        start_line: usize,
        end_line: usize,
    },
}

impl EditEvent {
    pub fn offset(&self) -> usize {
        match self {
            EditEvent::Inserted { offset, .. } | EditEvent::Erased { offset, .. } => *offset,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            EditEvent::Inserted { text, .. } | EditEvent::Erased { text, .. } => text,
        }
    }

    /// Length of the inserted or erased text in characters
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    pub fn lines(&self) -> (usize, usize) {
        match self {
            EditEvent::Inserted {
                start_line,
                end_line,
                ..
            }
            | EditEvent::Erased {
                start_line,
                end_line,
                ..
            } => (*start_line, *end_line),
        }
    }
}

/// Apply `edit` to `buffer` and describe what happened.
///
/// Offsets outside the buffer are rejected before anything is touched.
pub fn apply_edit<B: TextBufferMut>(buffer: &mut B, edit: Edit) -> Result<EditEvent> {
    let len_chars = buffer.len_chars();
    match edit {
        Edit::Insert { offset, text } => {
            if offset > len_chars {
                bail!("insert offset {offset} is past the end of the buffer ({len_chars} chars)");
            }
            let start_line = buffer.offset_to_line(offset);
            let lines_before = buffer.line_count();
            buffer.insert(offset, &text);
            let end_line = start_line + buffer.line_count().saturating_sub(lines_before);
            Ok(EditEvent::Inserted {
                offset,
                text,
                start_line,
                end_line,
            })
        }
        Edit::Delete { offset, len } => {
            let end = offset.saturating_add(len);
            if end > len_chars {
                bail!("delete range {offset}..{end} is past the end of the buffer ({len_chars} chars)");
            }
            let start_line = buffer.offset_to_line(offset);
            let lines_before = buffer.line_count();
            let text = buffer.slice(offset..end);
            buffer.remove(offset..end);
            let end_line = start_line + lines_before.saturating_sub(buffer.line_count());
            Ok(EditEvent::Erased {
                offset,
                text,
                start_line,
                end_line,
            })
        }
    }
}
