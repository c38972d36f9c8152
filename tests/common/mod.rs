//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use proptest::prelude::*;
use quire::session::EditSession;
use quire::spell::{WordListValidator, WordValidator};

pub const ENGLISH: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "hello", "world", "a", "cat",
];

/// Validator over a small English word list
pub fn english_validator() -> Box<dyn WordValidator> {
    Box::new(WordListValidator::from_words("en", ENGLISH.iter().copied()))
}

/// Session with the English validator installed and every line validated
pub fn validated_session(text: &str) -> EditSession {
    let mut session = EditSession::with_text(text);
    session.set_validator(english_validator());
    session.run_until_idle(usize::MAX);
    session.drain_events();
    session
}

/// Indices of dirty lines, ascending
pub fn dirty_lines(session: &EditSession) -> Vec<usize> {
    let tracker = session.dirty_lines();
    (0..tracker.len()).filter(|&i| tracker.is_dirty(i)).collect()
}

/// Misspelled words currently marked, in buffer order
pub fn suspects(session: &EditSession) -> Vec<String> {
    session
        .suspect_words()
        .into_iter()
        .map(|(_, word)| word)
        .collect()
}

/// Validator that records every word it is asked about
pub struct CountingValidator {
    inner: WordListValidator,
    pub checked: Rc<RefCell<Vec<String>>>,
}

impl CountingValidator {
    pub fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let checked = Rc::new(RefCell::new(Vec::new()));
        let validator = Self {
            inner: WordListValidator::from_words("en", ENGLISH.iter().copied()),
            checked: Rc::clone(&checked),
        };
        (validator, checked)
    }
}

impl WordValidator for CountingValidator {
    fn check(&self, word: &str) -> bool {
        self.checked.borrow_mut().push(word.to_string());
        self.inner.check(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        self.inner.suggest(word)
    }

    fn add_word(&mut self, word: &str) -> Result<()> {
        self.inner.add_word(word)
    }

    fn ignore_word(&mut self, word: &str) {
        self.inner.ignore_word(word)
    }
}

/// One step of a generated editing session. Positions are reduced modulo
/// the current text length when applied.
#[derive(Debug, Clone)]
pub enum EditOp {
    Insert { position: usize, text: &'static str },
    Delete { position: usize, len: usize },
    IdleTick,
}

const INSERTS: &[&str] = &["x", "yz", "\n", "new line\n", "é", " ", "a\nb\nc", "\n\n\n", "ö"];

pub fn arb_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        3 => (any::<usize>(), prop::sample::select(INSERTS))
            .prop_map(|(position, text)| EditOp::Insert { position, text }),
        2 => (any::<usize>(), 1..=12usize)
            .prop_map(|(position, len)| EditOp::Delete { position, len }),
        1 => Just(EditOp::IdleTick),
    ]
}

pub fn arb_edit_ops(max_len: usize) -> impl Strategy<Value = Vec<EditOp>> {
    prop::collection::vec(arb_edit_op(), 1..max_len)
}

/// Apply `op` to the session. Returns true if it changed the text.
pub fn apply_op(session: &mut EditSession, op: &EditOp) -> bool {
    let len = session.text().chars().count();
    match *op {
        EditOp::Insert { position, text } => {
            session.insert(position % (len + 1), text).unwrap();
            true
        }
        EditOp::Delete { position, len: count } => {
            if len == 0 {
                return false;
            }
            let offset = position % len;
            session.delete(offset, count.min(len - offset)).unwrap();
            true
        }
        EditOp::IdleTick => {
            session.idle_tick();
            false
        }
    }
}
