//! Dirty line tracking for incremental re-validation.
//!
//! One flag per buffer line, index-aligned with the buffer. Edits must be fed
//! in the order the buffer applied them, after they took effect, so the slot
//! count always equals the buffer's line count.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyLineTracker {
    lines: Vec<bool>,
}

impl DirtyLineTracker {
    /// Tracker for a freshly loaded buffer: every line needs validation.
    pub fn new(line_count: usize) -> Self {
        Self {
            lines: vec![true; line_count],
        }
    }

    /// Resize to `line_count` slots, all set to `dirty`.
    pub fn reset(&mut self, line_count: usize, dirty: bool) {
        self.lines.clear();
        self.lines.resize(line_count, dirty);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_dirty(&self, line: usize) -> bool {
        self.lines.get(line).copied().unwrap_or(false)
    }

    pub fn dirty_count(&self) -> usize {
        self.lines.iter().filter(|dirty| **dirty).count()
    }

    /// An insertion starting on `start_line` ended on `end_line`.
    pub fn on_insert(&mut self, start_line: usize, end_line: usize) {
        debug_assert!(end_line >= start_line, "insert ends before it starts");
        let start_line = self.clamp_line(start_line, "on_insert");
        let end_line = end_line.max(start_line);

        let added = end_line - start_line;
        if added > 0 {
            let at = (start_line + 1).min(self.lines.len());
            self.lines
                .splice(at..at, std::iter::repeat(true).take(added));
        }
        self.mark(start_line);
    }

    /// An erase removed content spanning `start_line..=end_line`.
    pub fn on_erase(&mut self, start_line: usize, end_line: usize) {
        debug_assert!(end_line >= start_line, "erase ends before it starts");
        let start_line = self.clamp_line(start_line, "on_erase");
        let end_line = end_line.max(start_line);

        let first_removed = start_line + 1;
        let last_removed = end_line.min(self.lines.len().saturating_sub(1));
        if first_removed <= last_removed {
            self.lines.drain(first_removed..=last_removed);
        }
        if last_removed < end_line {
            debug_assert!(
                false,
                "erase of lines {start_line}..={end_line} exceeds tracked {} lines",
                self.lines.len()
            );
            tracing::warn!(
                start_line,
                end_line,
                tracked = self.lines.len(),
                "erase range exceeds tracked lines, clamping"
            );
        }

        self.mark(start_line);
        // The next line may have been joined onto this one
        if start_line + 1 < self.lines.len() {
            self.lines[start_line + 1] = true;
        }
    }

    /// True iff any line needs validation
    pub fn has_dirty(&self) -> bool {
        self.lines.iter().any(|dirty| *dirty)
    }

    /// Lowest-indexed dirty line
    pub fn next_dirty(&self) -> Option<usize> {
        self.lines.iter().position(|dirty| *dirty)
    }

    /// Unmark a line after it has been validated
    pub fn clear(&mut self, line: usize) {
        if let Some(slot) = self.lines.get_mut(line) {
            *slot = false;
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.lines.fill(true);
    }

    pub fn mark_all_clean(&mut self) {
        self.lines.fill(false);
    }

    fn mark(&mut self, line: usize) {
        if let Some(slot) = self.lines.get_mut(line) {
            *slot = true;
        }
    }

    /// Bring an incoming line number into range. Out-of-range input means an
    /// event was missed: loud in debug builds, clamped in release builds.
    fn clamp_line(&mut self, line: usize, op: &str) -> usize {
        if self.lines.is_empty() {
            self.lines.push(true);
        }
        let last = self.lines.len() - 1;
        if line > last {
            debug_assert!(false, "{op}: line {line} out of range (tracked {} lines)", last + 1);
            tracing::warn!(op, line, tracked = last + 1, "line out of range, clamping");
            return last;
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(n: usize) -> DirtyLineTracker {
        let mut t = DirtyLineTracker::new(n);
        t.mark_all_clean();
        t
    }

    fn dirty_lines(t: &DirtyLineTracker) -> Vec<usize> {
        (0..t.len()).filter(|&i| t.is_dirty(i)).collect()
    }

    #[test]
    fn test_single_line_insert_marks_line() {
        let mut t = clean(3);
        t.on_insert(1, 1);
        assert_eq!(t.len(), 3);
        assert_eq!(dirty_lines(&t), vec![1]);
    }

    #[test]
    fn test_multi_line_insert_grows_index() {
        let mut t = clean(5);
        t.on_insert(2, 4);
        assert_eq!(t.len(), 7);
        assert_eq!(dirty_lines(&t), vec![2, 3, 4]);
    }

    #[test]
    fn test_insert_on_last_line_appends() {
        let mut t = clean(2);
        t.on_insert(1, 3);
        assert_eq!(t.len(), 4);
        assert_eq!(dirty_lines(&t), vec![1, 2, 3]);
    }

    #[test]
    fn test_erase_collapses_range() {
        let mut t = clean(7);
        t.on_erase(2, 4);
        assert_eq!(t.len(), 5);
        assert!(t.is_dirty(2));
        // Line that moved up underneath the join point
        assert!(t.is_dirty(3));
        assert!(!t.is_dirty(0) && !t.is_dirty(1) && !t.is_dirty(4));
    }

    #[test]
    fn test_erase_on_last_line_marks_only_it() {
        let mut t = clean(3);
        t.on_erase(1, 2);
        assert_eq!(t.len(), 2);
        assert_eq!(dirty_lines(&t), vec![1]);
    }

    #[test]
    fn test_erase_within_line_keeps_length() {
        let mut t = clean(4);
        t.on_erase(1, 1);
        assert_eq!(t.len(), 4);
        assert_eq!(dirty_lines(&t), vec![1, 2]);
    }

    #[test]
    fn test_next_dirty_and_clear() {
        let mut t = clean(6);
        t.on_insert(4, 4);
        t.on_insert(1, 1);
        assert_eq!(t.next_dirty(), Some(1));
        t.clear(1);
        assert_eq!(t.next_dirty(), Some(4));
        t.clear(4);
        assert_eq!(t.next_dirty(), None);
        assert!(!t.has_dirty());
    }

    #[test]
    fn test_mark_all() {
        let mut t = DirtyLineTracker::new(3);
        assert_eq!(t.dirty_count(), 3);
        t.mark_all_clean();
        assert!(!t.has_dirty());
        t.mark_all_dirty();
        assert_eq!(t.dirty_count(), 3);
    }

    #[test]
    fn test_reset_resizes() {
        let mut t = DirtyLineTracker::new(3);
        t.reset(8, false);
        assert_eq!(t.len(), 8);
        assert!(!t.has_dirty());
    }
}
