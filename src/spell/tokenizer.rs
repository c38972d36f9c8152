//! Word tokenization of a single line.
//!
//! Boundaries follow Unicode word segmentation (UAX #29), so "don't" and
//! "naïve" are single words. A segment counts as a word when it contains at
//! least one alphanumeric character; whitespace and punctuation runs are
//! skipped. Positions are character columns within the line.

use std::ops::Range;

use unicode_segmentation::{UWordBounds, UnicodeSegmentation};

/// A maximal word span within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Character columns `[start, end)`
    pub columns: Range<usize>,
}

/// Iterator over the word tokens of a line.
pub struct WordTokenizer<'a> {
    segments: UWordBounds<'a>,
    column: usize,
    skip_before: usize,
}

impl<'a> WordTokenizer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            segments: line.split_word_bounds(),
            column: 0,
            skip_before: 0,
        }
    }

    /// Tokens from the word `column` snaps to (see [`snap_to_word`]) onward.
    pub fn starting_at(line: &'a str, column: usize) -> Self {
        let mut tokenizer = Self::new(line);
        tokenizer.skip_before = snap_to_word(line, column).map_or(usize::MAX, |word| word.start);
        tokenizer
    }
}

impl<'a> Iterator for WordTokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let segment = self.segments.next()?;
            let start = self.column;
            self.column += segment.chars().count();
            if start < self.skip_before || !is_word(segment) {
                continue;
            }
            return Some(Token {
                text: segment,
                columns: start..self.column,
            });
        }
    }
}

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

/// Snap `column` to the word validation should start from.
///
/// A column inside a word snaps forward to that word's end and then back to
/// its start. Column 0 is always treated as inside a word, even when the line
/// starts with whitespace or punctuation, so it snaps to the first word's end
/// and back. A column between words snaps to the next word. Returns `None`
/// when no word ends after `column`.
pub fn snap_to_word(line: &str, column: usize) -> Option<Range<usize>> {
    let mut tokens = WordTokenizer::new(line);
    if column == 0 {
        return tokens.next().map(|token| token.columns);
    }
    tokens
        .find(|token| token.columns.end > column)
        .map(|token| token.columns)
}

/// The word covering `column`, if `column` lies within one (end inclusive).
pub fn word_at(line: &str, column: usize) -> Option<Token<'_>> {
    WordTokenizer::new(line)
        .find(|token| token.columns.start <= column && column <= token.columns.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<(&str, Range<usize>)> {
        WordTokenizer::new(line)
            .map(|t| (t.text, t.columns))
            .collect()
    }

    #[test]
    fn test_splits_on_whitespace_and_punctuation() {
        assert_eq!(
            words("Hello, wrld! ok"),
            vec![("Hello", 0..5), ("wrld", 7..11), ("ok", 13..15)]
        );
    }

    #[test]
    fn test_keeps_contractions_together() {
        assert_eq!(words("don't stop"), vec![("don't", 0..5), ("stop", 6..10)]);
    }

    #[test]
    fn test_columns_are_characters() {
        assert_eq!(words("naïve café"), vec![("naïve", 0..5), ("café", 6..10)]);
    }

    #[test]
    fn test_empty_and_punctuation_only_lines() {
        assert!(words("").is_empty());
        assert!(words("  -- ... !!").is_empty());
    }

    #[test]
    fn test_snap_at_zero_goes_to_first_word() {
        assert_eq!(snap_to_word("  hello world", 0), Some(2..7));
        assert_eq!(snap_to_word("hello world", 0), Some(0..5));
        assert_eq!(snap_to_word("   ", 0), None);
    }

    #[test]
    fn test_snap_inside_word_goes_back_to_start() {
        assert_eq!(snap_to_word("hello world", 8), Some(6..11));
    }

    #[test]
    fn test_snap_between_words_goes_forward() {
        assert_eq!(snap_to_word("hello   world", 6), Some(8..13));
        assert_eq!(snap_to_word("hello", 5), None);
    }

    #[test]
    fn test_starting_at_skips_earlier_words() {
        let rest: Vec<_> = WordTokenizer::starting_at("one two three", 5)
            .map(|t| t.text)
            .collect();
        assert_eq!(rest, vec!["two", "three"]);

        assert_eq!(WordTokenizer::starting_at("one two", 7).count(), 0);
    }

    #[test]
    fn test_word_at() {
        assert_eq!(word_at("hello world", 3).map(|t| t.text), Some("hello"));
        assert_eq!(word_at("hello world", 11).map(|t| t.text), Some("world"));
        assert!(word_at("hello  world", 6).is_none());
    }
}
