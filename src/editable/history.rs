//! Mutation log (undo/redo) for edit sessions.
//!
//! Entries are primitive, character-offset operations. Undoing an entry moves
//! it to the redo stack with its kind flipped, so replaying whatever sits on
//! top of either stack is always "apply the inverse of this entry".

use std::collections::VecDeque;

use super::buffer::TextBuffer;
use super::edit::{Edit, EditEvent};

/// Default number of entries kept on each stack
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Insert,
    Delete,
}

impl MutationKind {
    pub fn toggled(self) -> Self {
        match self {
            MutationKind::Insert => MutationKind::Delete,
            MutationKind::Delete => MutationKind::Insert,
        }
    }
}

/// A single reversible mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationEntry {
    pub kind: MutationKind,
    /// The inserted or deleted text
    pub text: String,
    /// Character offset where the mutation happened
    pub offset: usize,
}

impl MutationEntry {
    pub fn new(kind: MutationKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn from_event(event: &EditEvent) -> Self {
        match event {
            EditEvent::Inserted { offset, text, .. } => {
                Self::new(MutationKind::Insert, text.clone(), *offset)
            }
            EditEvent::Erased { offset, text, .. } => {
                Self::new(MutationKind::Delete, text.clone(), *offset)
            }
        }
    }

    /// Flip Insert <-> Delete
    pub fn toggle(&mut self) {
        self.kind = self.kind.toggled();
    }

    /// The edit that undoes this entry
    pub fn inverse(&self) -> Edit {
        match self.kind {
            MutationKind::Insert => Edit::delete(self.offset, self.text.chars().count()),
            MutationKind::Delete => Edit::insert(self.offset, self.text.clone()),
        }
    }

    /// Whether `inverse()` can be replayed against `buffer` as recorded.
    ///
    /// Redo entries survive new edits, so the text an entry would delete may
    /// have moved or changed since it was recorded.
    pub fn applies_to<B: TextBuffer + ?Sized>(&self, buffer: &B) -> bool {
        let len_chars = buffer.len_chars();
        match self.kind {
            MutationKind::Insert => {
                let end = self.offset.saturating_add(self.text.chars().count());
                end <= len_chars && buffer.slice(self.offset..end) == self.text
            }
            MutationKind::Delete => self.offset <= len_chars,
        }
    }
}

/// Availability changes the host may want to reflect (menu items, toolbar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryNotice {
    CanUndo(bool),
    CanRedo(bool),
}

/// Stack that drops its oldest entries when it grows past `capacity`.
/// A capacity of 0 means unbounded.
#[derive(Debug, Clone, Default)]
struct BoundedStack {
    entries: VecDeque<MutationEntry>,
}

impl BoundedStack {
    fn push(&mut self, entry: MutationEntry, capacity: usize) {
        self.entries.push_back(entry);
        self.trim(capacity);
    }

    fn pop(&mut self) -> Option<MutationEntry> {
        self.entries.pop_back()
    }

    fn trim(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Undo/redo log with independently bounded stacks.
///
/// Recording new entries does not clear the redo stack.
#[derive(Debug, Clone)]
pub struct MutationLog {
    undo_stack: BoundedStack,
    redo_stack: BoundedStack,
    capacity: usize,
    recording: bool,
    notices: Vec<HistoryNotice>,
}

impl Default for MutationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationLog {
    /// Create a new log with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new log keeping at most `capacity` entries per stack (0 = unbounded)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: BoundedStack::default(),
            redo_stack: BoundedStack::default(),
            capacity,
            recording: true,
            notices: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the bound, trimming the oldest entries of both stacks right away.
    pub fn set_capacity(&mut self, capacity: usize) {
        let could_undo = self.can_undo();
        let could_redo = self.can_redo();
        self.capacity = capacity;
        self.undo_stack.trim(capacity);
        self.redo_stack.trim(capacity);
        self.notify_changes(could_undo, could_redo);
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Suspend or resume recording. Replays of undo/redo run with recording off.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    /// Record an applied edit, unless recording is suspended.
    pub fn observe(&mut self, event: &EditEvent) {
        if !self.recording {
            tracing::trace!(offset = event.offset(), "mutation not recorded (replaying)");
            return;
        }
        let entry = MutationEntry::from_event(event);
        self.record(entry.kind, entry.text, entry.offset);
    }

    /// Append a new entry to the undo stack.
    pub fn record(&mut self, kind: MutationKind, text: String, offset: usize) {
        debug_assert!(self.recording, "record() called while replaying history");
        let was_empty = self.undo_stack.is_empty();
        self.undo_stack
            .push(MutationEntry::new(kind, text, offset), self.capacity);
        if was_empty {
            self.notices.push(HistoryNotice::CanUndo(true));
        }
    }

    /// Take the most recent undo entry. The caller applies `entry.inverse()`
    /// and hands the entry back through [`MutationLog::push_redo`].
    pub fn pop_undo(&mut self) -> Option<MutationEntry> {
        let entry = self.undo_stack.pop()?;
        if self.undo_stack.is_empty() {
            self.notices.push(HistoryNotice::CanUndo(false));
        }
        Some(entry)
    }

    /// Take the most recent redo entry. Counterpart of [`MutationLog::pop_undo`].
    pub fn pop_redo(&mut self) -> Option<MutationEntry> {
        let entry = self.redo_stack.pop()?;
        if self.redo_stack.is_empty() {
            self.notices.push(HistoryNotice::CanRedo(false));
        }
        Some(entry)
    }

    /// Toggle an entry that was just undone and move it onto the redo stack.
    pub fn push_redo(&mut self, mut entry: MutationEntry) {
        entry.toggle();
        let was_empty = self.redo_stack.is_empty();
        self.redo_stack.push(entry, self.capacity);
        if was_empty {
            self.notices.push(HistoryNotice::CanRedo(true));
        }
    }

    /// Toggle an entry that was just redone and move it back onto the undo stack.
    pub fn push_undo(&mut self, mut entry: MutationEntry) {
        entry.toggle();
        let was_empty = self.undo_stack.is_empty();
        self.undo_stack.push(entry, self.capacity);
        if was_empty {
            self.notices.push(HistoryNotice::CanUndo(true));
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        let could_undo = self.can_undo();
        let could_redo = self.can_redo();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify_changes(could_undo, could_redo);
    }

    /// Get the number of entries in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of entries in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Entries of the undo stack, oldest first
    pub fn undo_entries(&self) -> impl Iterator<Item = &MutationEntry> {
        self.undo_stack.entries.iter()
    }

    /// Entries of the redo stack, oldest first
    pub fn redo_entries(&self) -> impl Iterator<Item = &MutationEntry> {
        self.redo_stack.entries.iter()
    }

    /// Availability changes since the last drain
    pub fn drain_notices(&mut self) -> Vec<HistoryNotice> {
        std::mem::take(&mut self.notices)
    }

    fn notify_changes(&mut self, could_undo: bool, could_redo: bool) {
        if could_undo != self.can_undo() {
            self.notices.push(HistoryNotice::CanUndo(self.can_undo()));
        }
        if could_redo != self.can_redo() {
            self.notices.push(HistoryNotice::CanRedo(self.can_redo()));
        }
    }
}
