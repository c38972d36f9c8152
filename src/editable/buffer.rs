//! Text buffer traits and the rope-backed implementation used by edit sessions.
//!
//! `TextBuffer` is the read side the validation scheduler needs (line text and
//! offset/line mapping); `TextBufferMut` adds the two primitive mutations the
//! session applies. All offsets are character offsets, never bytes.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

/// Read-only view into a line-oriented text buffer.
pub trait TextBuffer {
    /// Number of lines (always >= 1). A trailing newline opens an empty last line.
    fn line_count(&self) -> usize;

    /// Total length in characters
    fn len_chars(&self) -> usize;

    /// Check if buffer is empty
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Get line content (without trailing newline)
    fn line(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Line containing the character offset (offsets past the end map to the last line)
    fn offset_to_line(&self, offset: usize) -> usize;

    /// Character offset of the first character of `line`
    fn line_to_offset(&self, line: usize) -> usize;

    /// Convert character offset to (line, column)
    fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len_chars());
        let line = self.offset_to_line(offset);
        (line, offset - self.line_to_offset(line))
    }

    /// Get slice of text as String (by character indices)
    fn slice(&self, range: Range<usize>) -> String;

    /// Get full content as String (may be expensive for large buffers)
    fn content(&self) -> String;
}

/// Mutable buffer operations. Extends TextBuffer.
pub trait TextBufferMut: TextBuffer {
    /// Insert text at character offset
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove text in character range
    fn remove(&mut self, range: Range<usize>);

    /// Set content, replacing everything
    fn set_content(&mut self, text: &str) {
        let len = self.len_chars();
        if len > 0 {
            self.remove(0..len);
        }
        self.insert(0, text);
    }
}

/// TextBuffer implementation wrapping ropey::Rope.
#[derive(Debug, Clone)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a RopeBuffer from a string slice
    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Access the underlying Rope for rope-specific operations
    pub fn rope(&self) -> &Rope {
        &self.rope
    }
}

impl Default for RopeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let line_slice = self.rope.line(line);
        let s = line_slice.to_string();
        // Strip trailing newline
        let trimmed = s.trim_end_matches(&['\n', '\r'][..]).to_string();
        Some(Cow::Owned(trimmed))
    }

    fn offset_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    fn line_to_offset(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }
}

impl TextBufferMut for RopeBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        let clamped = offset.min(self.len_chars());
        self.rope.insert(clamped, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rope_buffer_multiline() {
        let buf = RopeBuffer::from_text("line1\nline2\nline3");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line(0).unwrap().as_ref(), "line1");
        assert_eq!(buf.line(1).unwrap().as_ref(), "line2");
        assert_eq!(buf.line(2).unwrap().as_ref(), "line3");
        assert!(buf.line(3).is_none());
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let buf = RopeBuffer::from_text("one\ntwo\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line(2).unwrap().as_ref(), "");
        assert_eq!(RopeBuffer::new().line_count(), 1);
    }

    #[test]
    fn test_rope_buffer_line_mapping() {
        let buf = RopeBuffer::from_text("hello\nworld");
        assert_eq!(buf.offset_to_line(0), 0);
        assert_eq!(buf.offset_to_line(5), 0);
        assert_eq!(buf.offset_to_line(6), 1);
        assert_eq!(buf.offset_to_line(99), 1);

        assert_eq!(buf.line_to_offset(0), 0);
        assert_eq!(buf.line_to_offset(1), 6);
        assert_eq!(buf.line_to_offset(7), 11);
        assert_eq!(buf.offset_to_position(8), (1, 2));
    }

    #[test]
    fn test_rope_buffer_utf8_offsets_are_chars() {
        let mut buf = RopeBuffer::from_text("héllo");
        buf.insert(2, "X");
        assert_eq!(buf.content(), "héXllo");
        assert_eq!(buf.slice(1..3), "éX");
    }

    #[test]
    fn test_rope_buffer_remove() {
        let mut buf = RopeBuffer::from_text("hello\nworld");
        buf.remove(5..6); // Remove newline
        assert_eq!(buf.content(), "helloworld");
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_set_content() {
        let mut buf = RopeBuffer::from_text("old\ntext");
        buf.set_content("new");
        assert_eq!(buf.content(), "new");
        assert!(!buf.is_empty());
    }
}
