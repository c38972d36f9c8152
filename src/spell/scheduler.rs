//! Cooperative re-validation of dirty lines.
//!
//! The scheduler does not own a loop. A host arms it when lines become dirty
//! and calls [`ValidationScheduler::run_one_step`] once per idle tick; each
//! call validates exactly one line and says whether to be called again.

use crate::editable::TextBuffer;

use super::dirty::DirtyLineTracker;
use super::highlight::Highlighter;
use super::tokenizer::WordTokenizer;
use super::validator::WordValidator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing to do; not registered with the host loop
    #[default]
    Idle,
    /// Dirty lines pending; the host should keep calling `run_one_step`
    Armed,
}

/// What the host loop should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Call again on the next idle tick
    Continue,
    /// Deregister; the scheduler is idle
    Finished,
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub lines_checked: u64,
    pub words_checked: u64,
    pub suspects_marked: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationScheduler {
    state: SchedulerState,
    stats: ValidationStats,
}

impl ValidationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == SchedulerState::Armed
    }

    pub fn stats(&self) -> ValidationStats {
        self.stats
    }

    /// Register for idle ticks. Arming an armed scheduler is a no-op.
    pub fn arm(&mut self) {
        if self.state == SchedulerState::Idle {
            tracing::trace!("validation scheduler armed");
            self.state = SchedulerState::Armed;
        }
    }

    /// Deregister between steps (validation turned off, session closing).
    pub fn disarm(&mut self) {
        if self.state == SchedulerState::Armed {
            tracing::trace!("validation scheduler disarmed");
            self.state = SchedulerState::Idle;
        }
    }

    /// Validate the lowest dirty line.
    ///
    /// Suspect marks across the line are cleared, then every word token is
    /// checked and marked suspect if the validator rejects it. The line is
    /// clean afterwards.
    pub fn run_one_step<B, H>(
        &mut self,
        buffer: &B,
        tracker: &mut DirtyLineTracker,
        validator: &dyn WordValidator,
        highlighter: &mut H,
    ) -> StepOutcome
    where
        B: TextBuffer + ?Sized,
        H: Highlighter + ?Sized,
    {
        if !self.is_armed() {
            return StepOutcome::Finished;
        }
        let Some(line) = tracker.next_dirty() else {
            self.disarm();
            return StepOutcome::Finished;
        };

        match buffer.line(line) {
            Some(text) => {
                let line_start = buffer.line_to_offset(line);
                let line_end = line_start + text.chars().count();
                highlighter.clear_suspect(line_start..line_end);

                for token in WordTokenizer::starting_at(&text, 0) {
                    let range = line_start + token.columns.start..line_start + token.columns.end;
                    self.stats.words_checked += 1;
                    if validator.check(token.text) {
                        highlighter.clear_suspect(range);
                    } else {
                        tracing::trace!(line, word = token.text, "suspect word");
                        self.stats.suspects_marked += 1;
                        highlighter.mark_suspect(range);
                    }
                }
            }
            None => {
                debug_assert!(false, "dirty line {line} is past the end of the buffer");
                tracing::warn!(line, "dirty line past the end of the buffer, dropping");
            }
        }

        tracker.clear(line);
        self.stats.lines_checked += 1;
        StepOutcome::Continue
    }
}
