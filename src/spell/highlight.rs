//! Suspect-word marking surface.

use std::ops::Range;

use crate::editable::EditEvent;

/// Receives the validation results of the scheduler, as buffer offset ranges.
pub trait Highlighter {
    fn mark_suspect(&mut self, range: Range<usize>);
    fn clear_suspect(&mut self, range: Range<usize>);
}

/// In-memory suspect marks, kept sorted and non-overlapping.
///
/// Marks follow the text they cover: feed every [`EditEvent`] to
/// [`SuspectMarks::on_edit`] and they shift, stretch or shrink the way tags on
/// a text widget would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuspectMarks {
    marks: Vec<Range<usize>>,
}

impl SuspectMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[Range<usize>] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// The mark covering `offset`; a caret just after a word counts as on it.
    pub fn mark_at(&self, offset: usize) -> Option<Range<usize>> {
        self.marks
            .iter()
            .find(|mark| mark.start <= offset && offset <= mark.end)
            .cloned()
    }

    pub fn clear_all(&mut self) {
        self.marks.clear();
    }

    /// Keep marks aligned with the buffer after it applied `event`.
    pub fn on_edit(&mut self, event: &EditEvent) {
        let offset = event.offset();
        let len = event.char_len();
        if len == 0 || self.marks.is_empty() {
            return;
        }
        match event {
            EditEvent::Inserted { .. } => {
                for mark in &mut self.marks {
                    if mark.start >= offset {
                        mark.start += len;
                        mark.end += len;
                    } else if offset < mark.end {
                        mark.end += len;
                    }
                }
            }
            EditEvent::Erased { .. } => {
                let end = offset + len;
                let map = |pos: usize| {
                    if pos <= offset {
                        pos
                    } else if pos >= end {
                        pos - len
                    } else {
                        offset
                    }
                };
                for mark in &mut self.marks {
                    *mark = map(mark.start)..map(mark.end);
                }
                self.marks.retain(|mark| !mark.is_empty());
            }
        }
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

impl Highlighter for SuspectMarks {
    fn mark_suspect(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.marks.retain(|mark| !overlaps(mark, &range));
        let at = self.marks.partition_point(|mark| mark.start < range.start);
        self.marks.insert(at, range);
    }

    fn clear_suspect(&mut self, range: Range<usize>) {
        self.marks.retain(|mark| !overlaps(mark, &range));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inserted(offset: usize, text: &str) -> EditEvent {
        EditEvent::Inserted {
            offset,
            text: text.to_string(),
            start_line: 0,
            end_line: 0,
        }
    }

    fn erased(offset: usize, text: &str) -> EditEvent {
        EditEvent::Erased {
            offset,
            text: text.to_string(),
            start_line: 0,
            end_line: 0,
        }
    }

    #[test]
    fn test_marks_stay_sorted() {
        let mut marks = SuspectMarks::new();
        marks.mark_suspect(10..14);
        marks.mark_suspect(0..3);
        marks.mark_suspect(5..8);
        assert_eq!(marks.marks(), &[0..3, 5..8, 10..14]);
    }

    #[test]
    fn test_mark_replaces_overlapping() {
        let mut marks = SuspectMarks::new();
        marks.mark_suspect(0..5);
        marks.mark_suspect(3..9);
        assert_eq!(marks.marks(), &[3..9]);
    }

    #[test]
    fn test_clear_range() {
        let mut marks = SuspectMarks::new();
        marks.mark_suspect(0..3);
        marks.mark_suspect(5..8);
        marks.mark_suspect(10..14);
        marks.clear_suspect(4..12);
        assert_eq!(marks.marks(), &[0..3]);
    }

    #[test]
    fn test_insert_shifts_and_stretches() {
        let mut marks = SuspectMarks::new();
        marks.mark_suspect(2..5);
        marks.mark_suspect(8..10);

        marks.on_edit(&inserted(3, "xy"));
        assert_eq!(marks.marks(), &[2..7, 10..12]);

        // Insertion right at the end of a mark does not stretch it
        marks.on_edit(&inserted(7, "z"));
        assert_eq!(marks.marks(), &[2..7, 11..13]);
    }

    #[test]
    fn test_erase_shrinks_and_drops() {
        let mut marks = SuspectMarks::new();
        marks.mark_suspect(2..5);
        marks.mark_suspect(8..10);
        marks.mark_suspect(12..15);

        marks.on_edit(&erased(4, "abcdefgh")); // 4..12
        assert_eq!(marks.marks(), &[2..4, 4..7]);
    }

    #[test]
    fn test_mark_at() {
        let mut marks = SuspectMarks::new();
        marks.mark_suspect(4..8);
        assert_eq!(marks.mark_at(4), Some(4..8));
        assert_eq!(marks.mark_at(8), Some(4..8));
        assert_eq!(marks.mark_at(9), None);
    }
}
