//! Incremental spell re-validation.
//!
//! - [`DirtyLineTracker`]: which lines changed since they were last checked
//! - [`WordTokenizer`]: Unicode word spans of a line
//! - [`WordValidator`]: the oracle deciding whether a word is spelled correctly
//! - [`Highlighter`]: where suspect words are marked
//! - [`ValidationScheduler`]: checks one dirty line per idle tick

mod dirty;
mod highlight;
mod scheduler;
mod tokenizer;
mod validator;

pub use dirty::DirtyLineTracker;
pub use highlight::{Highlighter, SuspectMarks};
pub use scheduler::{SchedulerState, StepOutcome, ValidationScheduler, ValidationStats};
pub use tokenizer::{snap_to_word, word_at, Token, WordTokenizer};
pub use validator::{WordListValidator, WordValidator, DEFAULT_MAX_SUGGESTIONS};
