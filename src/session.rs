//! Edit session - one open document with its undo history and spell state
//!
//! The session is the single mutation entry point. Every applied edit produces
//! one [`EditEvent`] that is handed, in order, to the mutation log, the dirty
//! line tracker and the suspect marks before the next edit is accepted.

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::EditorConfig;
use crate::editable::{
    apply_edit, Edit, EditEvent, HistoryNotice, MutationEntry, MutationLog, RopeBuffer,
    TextBuffer, TextBufferMut,
};
use crate::spell::{
    DirtyLineTracker, StepOutcome, SuspectMarks, ValidationScheduler, ValidationStats,
    WordValidator,
};

/// Notifications for the host, drained with [`EditSession::drain_events`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CanUndoChanged(bool),
    CanRedoChanged(bool),
    /// The validator could not be loaded; validation has been switched off
    ValidatorUnavailable(String),
    /// Every line has been validated; the scheduler went idle
    ValidationIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    Undo,
    Redo,
}

pub struct EditSession {
    buffer: RopeBuffer,
    log: MutationLog,
    tracker: DirtyLineTracker,
    scheduler: ValidationScheduler,
    marks: SuspectMarks,
    validator: Option<Box<dyn WordValidator>>,
    validation_enabled: bool,
    events: Vec<SessionEvent>,
    file_path: Option<PathBuf>,
    is_modified: bool,
    revision: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Create an empty session with default settings
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a session with initial text
    pub fn with_text(text: &str) -> Self {
        Self::with_config(text, &EditorConfig::default())
    }

    pub fn with_config(text: &str, config: &EditorConfig) -> Self {
        let buffer = RopeBuffer::from_text(text);
        let tracker = DirtyLineTracker::new(buffer.line_count());
        Self {
            buffer,
            log: MutationLog::with_capacity(config.history_capacity),
            tracker,
            scheduler: ValidationScheduler::new(),
            marks: SuspectMarks::new(),
            validator: None,
            validation_enabled: config.spell_check,
            events: Vec::new(),
            file_path: None,
            is_modified: false,
            revision: 0,
        }
    }

    /// Load a session from a file path
    pub fn from_file(path: &Path, config: &EditorConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut session = Self::with_config(&content, config);
        session.file_path = Some(path.to_path_buf());
        tracing::debug!(
            "Opened {} ({} lines)",
            path.display(),
            session.buffer.line_count()
        );
        Ok(session)
    }

    // === Document ===

    pub fn buffer(&self) -> &RopeBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Whether the buffer has unsaved changes
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    /// Incremented on each applied edit
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Write the buffer to `path` and remember it as the session's file
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        std::fs::write(path, self.buffer.content())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.file_path = Some(path.to_path_buf());
        self.mark_saved();
        Ok(())
    }

    // === Editing ===

    /// Insert `text` at character `offset` (recorded for undo)
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.apply(Edit::insert(offset, text))
    }

    /// Delete `len` characters at character `offset` (recorded for undo)
    pub fn delete(&mut self, offset: usize, len: usize) -> Result<()> {
        self.apply(Edit::delete(offset, len))
    }

    /// Apply a user edit
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        if edit.is_noop() {
            return Ok(());
        }
        let event = apply_edit(&mut self.buffer, edit)?;
        self.dispatch(&event);
        Ok(())
    }

    /// Replace the whole content without recording it (load, revert from disk).
    ///
    /// History is cleared and every line becomes dirty.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_content(text);
        self.log.clear();
        self.marks.clear_all();
        self.tracker
            .reset(self.buffer.line_count(), self.validation_active());
        if self.validation_active() {
            self.scheduler.arm();
        }
        self.revision += 1;
        self.is_modified = false;
        self.pump_history_notices();
    }

    /// Hand an applied edit to every consumer, in order.
    fn dispatch(&mut self, event: &EditEvent) {
        self.log.observe(event);

        let (start_line, end_line) = event.lines();
        match event {
            EditEvent::Inserted { .. } => self.tracker.on_insert(start_line, end_line),
            EditEvent::Erased { .. } => self.tracker.on_erase(start_line, end_line),
        }
        debug_assert_eq!(
            self.tracker.len(),
            self.buffer.line_count(),
            "dirty line index out of step with the buffer"
        );
        self.marks.on_edit(event);

        if self.validation_active() && self.tracker.has_dirty() {
            self.scheduler.arm();
        }
        self.revision += 1;
        self.is_modified = true;
        self.pump_history_notices();
    }

    // === History ===

    /// Undo the most recent mutation. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.replay(Replay::Undo)
    }

    /// Redo the most recently undone mutation
    pub fn redo(&mut self) -> bool {
        self.replay(Replay::Redo)
    }

    fn replay(&mut self, direction: Replay) -> bool {
        let entry = match direction {
            Replay::Undo => self.log.pop_undo(),
            Replay::Redo => self.log.pop_redo(),
        };
        let Some(entry) = entry else {
            return false;
        };

        // Redo entries outlive later edits; the text they refer to may be gone
        if !entry.applies_to(&self.buffer) {
            tracing::warn!(
                ?direction,
                offset = entry.offset,
                text = %entry.text,
                "History entry no longer matches the buffer, dropping it"
            );
            self.pump_history_notices();
            return false;
        }

        self.log.set_recording(false);
        let applied = self.apply_inverse(&entry);
        self.log.set_recording(true);

        if applied {
            match direction {
                Replay::Undo => self.log.push_redo(entry),
                Replay::Redo => self.log.push_undo(entry),
            }
        } else {
            // History no longer matches the buffer; undo/redo become unavailable
            self.log.clear();
        }
        self.pump_history_notices();
        applied
    }

    /// Apply the inverse of `entry` through the normal mutation path.
    /// The entry has already been checked against the buffer.
    fn apply_inverse(&mut self, entry: &MutationEntry) -> bool {
        match apply_edit(&mut self.buffer, entry.inverse()) {
            Ok(event) => {
                debug_assert_eq!(event.text(), entry.text, "replayed text differs from entry");
                self.dispatch(&event);
                true
            }
            Err(e) => {
                debug_assert!(false, "history replay failed: {e:#}");
                tracing::error!("History replay failed, clearing history: {:#}", e);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    pub fn history(&self) -> &MutationLog {
        &self.log
    }

    /// Drop all undo/redo entries (e.g., after revert)
    pub fn clear_history(&mut self) {
        self.log.clear();
        self.pump_history_notices();
    }

    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.log.set_capacity(capacity);
        self.pump_history_notices();
    }

    fn pump_history_notices(&mut self) {
        self.events
            .extend(self.log.drain_notices().into_iter().map(|notice| match notice {
                HistoryNotice::CanUndo(can) => SessionEvent::CanUndoChanged(can),
                HistoryNotice::CanRedo(can) => SessionEvent::CanRedoChanged(can),
            }));
    }

    // === Validation ===

    /// True when validation is switched on and a validator is installed
    pub fn validation_active(&self) -> bool {
        self.validation_enabled && self.validator.is_some()
    }

    pub fn enable_validation(&mut self, enabled: bool) {
        if !enabled {
            tracing::debug!("Validation disabled");
            self.validation_enabled = false;
            self.stop_validation();
            return;
        }
        self.validation_enabled = true;
        if self.validator.is_none() {
            self.validator_unavailable("no validator installed".to_string());
            return;
        }
        self.revalidate_all();
    }

    /// Install a new validator; every line is checked again against it.
    pub fn set_validator(&mut self, validator: Box<dyn WordValidator>) {
        self.validator = Some(validator);
        if self.validation_enabled {
            self.revalidate_all();
        }
    }

    /// Install the result of loading a validator.
    ///
    /// On failure validation is switched off, the host is told through
    /// [`SessionEvent::ValidatorUnavailable`], and the error is returned.
    pub fn load_validator<F>(&mut self, load: F) -> Result<()>
    where
        F: FnOnce() -> Result<Box<dyn WordValidator>>,
    {
        match load() {
            Ok(validator) => {
                self.set_validator(validator);
                Ok(())
            }
            Err(e) => {
                self.validator_unavailable(format!("{e:#}"));
                Err(e)
            }
        }
    }

    fn validator_unavailable(&mut self, reason: String) {
        tracing::warn!("Validator unavailable, disabling validation: {}", reason);
        self.validator = None;
        self.validation_enabled = false;
        self.stop_validation();
        self.events.push(SessionEvent::ValidatorUnavailable(reason));
    }

    fn stop_validation(&mut self) {
        self.tracker.mark_all_clean();
        self.scheduler.disarm();
        self.marks.clear_all();
    }

    fn revalidate_all(&mut self) {
        if !self.validation_active() {
            return;
        }
        self.tracker.mark_all_dirty();
        self.scheduler.arm();
    }

    /// Accept `word` permanently. Lines are re-checked since earlier verdicts may change.
    pub fn add_to_dictionary(&mut self, word: &str) -> Result<()> {
        let Some(validator) = self.validator.as_deref_mut() else {
            anyhow::bail!("No validator installed");
        };
        validator.add_word(word)?;
        self.revalidate_all();
        Ok(())
    }

    /// Accept `word` for this session only
    pub fn ignore_word(&mut self, word: &str) {
        if let Some(validator) = self.validator.as_deref_mut() {
            validator.ignore_word(word);
            self.revalidate_all();
        }
    }

    /// Whether the host should keep calling [`EditSession::idle_tick`]
    pub fn is_validation_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Run one validation step; call once per host idle tick while armed.
    pub fn idle_tick(&mut self) -> StepOutcome {
        let Some(validator) = self.validator.as_deref() else {
            self.scheduler.disarm();
            return StepOutcome::Finished;
        };
        if !self.validation_enabled {
            self.scheduler.disarm();
            return StepOutcome::Finished;
        }

        let was_armed = self.scheduler.is_armed();
        let outcome =
            self.scheduler
                .run_one_step(&self.buffer, &mut self.tracker, validator, &mut self.marks);
        if outcome == StepOutcome::Finished && was_armed {
            tracing::debug!(stats = ?self.scheduler.stats(), "Validation idle");
            self.events.push(SessionEvent::ValidationIdle);
        }
        outcome
    }

    /// Drive the scheduler until it goes idle or `max_steps` steps ran.
    /// Returns the number of lines validated.
    pub fn run_until_idle(&mut self, max_steps: usize) -> usize {
        let before = self.scheduler.stats().lines_checked;
        for _ in 0..max_steps {
            if self.idle_tick() == StepOutcome::Finished {
                break;
            }
        }
        (self.scheduler.stats().lines_checked - before) as usize
    }

    pub fn dirty_lines(&self) -> &DirtyLineTracker {
        &self.tracker
    }

    pub fn validation_stats(&self) -> ValidationStats {
        self.scheduler.stats()
    }

    /// Offset ranges of words currently marked as misspelled
    pub fn suspect_ranges(&self) -> &[Range<usize>] {
        self.marks.marks()
    }

    /// Misspelled words with their offset ranges
    pub fn suspect_words(&self) -> Vec<(Range<usize>, String)> {
        self.marks
            .marks()
            .iter()
            .map(|range| (range.clone(), self.buffer.slice(range.clone())))
            .collect()
    }

    /// Suggestions for the misspelled word at `offset`, empty if there is none
    pub fn suggestions_at(&self, offset: usize) -> Vec<String> {
        let (Some(validator), Some(range)) = (self.validator.as_deref(), self.marks.mark_at(offset))
        else {
            return Vec::new();
        };
        validator.suggest(&self.buffer.slice(range))
    }

    // === Events ===

    /// Notifications since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
