//! Word validity oracle.
//!
//! The scheduler only needs [`WordValidator::check`]; suggestions and the
//! personal dictionary are used by whoever presents results to the user.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Default cap on the number of suggestions returned for a word
pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// Words further than this many edits away are never suggested
const MAX_SUGGESTION_DISTANCE: usize = 2;

pub trait WordValidator {
    /// True if `word` is spelled correctly
    fn check(&self, word: &str) -> bool;

    /// Replacement candidates for `word`, best first
    fn suggest(&self, word: &str) -> Vec<String>;

    /// Accept `word` permanently (personal dictionary)
    fn add_word(&mut self, word: &str) -> Result<()>;

    /// Accept `word` for the rest of this session only
    fn ignore_word(&mut self, word: &str);
}

/// Validator backed by a plain word list.
///
/// Dictionary files hold one word per line; blank lines and `#` comments are
/// skipped. Hunspell-style `.dic` files also load: a leading entry count is
/// ignored and affix flags after `/` are dropped.
#[derive(Debug, Clone, Default)]
pub struct WordListValidator {
    language: String,
    words: HashSet<String>,
    personal: HashSet<String>,
    ignored: HashSet<String>,
    personal_path: Option<PathBuf>,
    max_suggestions: usize,
}

impl WordListValidator {
    pub fn from_words<I, S>(language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: language.to_string(),
            words: words.into_iter().map(Into::into).collect(),
            personal: HashSet::new(),
            ignored: HashSet::new(),
            personal_path: None,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Load a dictionary file. The language is taken from the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
        let language = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom")
            .to_string();
        let words = parse_word_list(&content);
        if words.is_empty() {
            bail!("Dictionary {} contains no words", path.display());
        }
        tracing::info!(
            "Loaded {} words for '{}' from {}",
            words.len(),
            language,
            path.display()
        );
        Ok(Self::from_words(&language, words))
    }

    /// Load `<dir>/<language>.dic`, falling back to `<dir>/<language>.txt`.
    pub fn load_language(dir: &Path, language: &str) -> Result<Self> {
        let candidates = [
            dir.join(format!("{language}.dic")),
            dir.join(format!("{language}.txt")),
        ];
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load(path),
            None => bail!(
                "No dictionary for language '{}' in {}",
                language,
                dir.display()
            ),
        }
    }

    /// Attach a personal dictionary file: its words are accepted and words
    /// added later are appended to it. A missing file is created on first add.
    pub fn with_personal_dictionary(mut self, path: PathBuf) -> Result<Self> {
        if path.is_file() {
            let content = fs::read_to_string(&path).with_context(|| {
                format!("Failed to read personal dictionary {}", path.display())
            })?;
            self.personal.extend(parse_word_list(&content));
        }
        self.personal_path = Some(path);
        Ok(self)
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    fn knows(&self, word: &str) -> bool {
        self.words.contains(word) || self.personal.contains(word) || self.ignored.contains(word)
    }
}

impl WordValidator for WordListValidator {
    fn check(&self, word: &str) -> bool {
        // Numbers and other letterless tokens are never misspelled
        if !word.chars().any(char::is_alphabetic) {
            return true;
        }
        if self.knows(word) {
            return true;
        }
        let lower = word.to_lowercase();
        lower != word && self.knows(&lower)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        let mut scored: Vec<(usize, &String)> = self
            .words
            .iter()
            .chain(self.personal.iter())
            .filter_map(|candidate| {
                let distance = edit_distance(&lower, &candidate.to_lowercase());
                (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE)
                    .then_some((distance, candidate))
            })
            .collect();
        scored.sort();
        scored.dedup_by(|a, b| a.1 == b.1);

        scored
            .into_iter()
            .take(self.max_suggestions)
            .map(|(_, candidate)| {
                if capitalized {
                    capitalize(candidate)
                } else {
                    candidate.clone()
                }
            })
            .collect()
    }

    fn add_word(&mut self, word: &str) -> Result<()> {
        if self.personal.contains(word) {
            return Ok(());
        }
        if let Some(path) = &self.personal_path {
            append_word(path, word)?;
            tracing::debug!("Added '{}' to {}", word, path.display());
        }
        // Only accepted once persisted, so a failed write leaves no trace
        self.personal.insert(word.to_string());
        Ok(())
    }

    fn ignore_word(&mut self, word: &str) {
        self.ignored.insert(word.to_string());
    }
}

fn append_word(path: &Path, word: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open personal dictionary {}", path.display()))?;
    writeln!(file, "{word}")
        .with_context(|| format!("Failed to write personal dictionary {}", path.display()))
}

fn parse_word_list(content: &str) -> HashSet<String> {
    let mut lines = content.lines().map(str::trim).peekable();
    // Hunspell .dic files start with an approximate entry count
    if lines
        .peek()
        .is_some_and(|first| !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()))
    {
        lines.next();
    }
    lines
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.split('/').next().unwrap_or(line).to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Levenshtein distance over characters, `usize::MAX` when the lengths alone
/// rule out a suggestion
fn edit_distance(a: &str, b: &str) -> usize {
    if a.chars().count().abs_diff(b.chars().count()) > MAX_SUGGESTION_DISTANCE {
        return usize::MAX;
    }
    strsim::levenshtein(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn english() -> WordListValidator {
        WordListValidator::from_words("en", ["hello", "world", "help", "word", "Rust"])
    }

    #[test]
    fn test_check_known_and_unknown() {
        let v = english();
        assert!(v.check("hello"));
        assert!(v.check("Hello"));
        assert!(v.check("HELLO"));
        assert!(v.check("Rust"));
        assert!(!v.check("rust"));
        assert!(!v.check("wrld"));
    }

    #[test]
    fn test_letterless_tokens_pass() {
        let v = english();
        assert!(v.check("2024"));
        assert!(v.check("42"));
    }

    #[test]
    fn test_suggest_ranks_by_distance() {
        let v = english();
        let suggestions = v.suggest("wrld");
        assert_eq!(suggestions.first().map(String::as_str), Some("world"));
        assert!(suggestions.contains(&"word".to_string()));
        assert!(!suggestions.contains(&"hello".to_string()));
    }

    #[test]
    fn test_suggest_keeps_capitalization() {
        let v = english();
        assert_eq!(v.suggest("Helo"), vec!["Hello", "Help"]);
    }

    #[test]
    fn test_suggest_respects_cap() {
        let v = english().with_max_suggestions(1);
        assert_eq!(v.suggest("wrd").len(), 1);
    }

    #[test]
    fn test_ignore_word_is_session_only() {
        let mut v = english();
        assert!(!v.check("quire"));
        v.ignore_word("quire");
        assert!(v.check("quire"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitten"), 1);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("", "ab"), 2);
        assert_eq!(edit_distance("a", "abcd"), usize::MAX);
        assert_eq!(edit_distance("café", "cafe"), 1);
    }

    #[test]
    fn test_parse_hunspell_dic() {
        let words = parse_word_list("3\nhello/MS\n# comment\n\nworld\ncafé/S\n");
        assert_eq!(words.len(), 3);
        assert!(words.contains("hello"));
        assert!(words.contains("café"));
    }

    #[test]
    fn test_load_language_from_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en_US.dic"), "2\nhello\nworld\n").unwrap();

        let v = WordListValidator::load_language(dir.path(), "en_US").unwrap();
        assert_eq!(v.language(), "en_US");
        assert_eq!(v.word_count(), 2);

        let err = WordListValidator::load_language(dir.path(), "de_DE").unwrap_err();
        assert!(err.to_string().contains("de_DE"));
    }

    #[test]
    fn test_empty_dictionary_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.dic");
        fs::write(&path, "# nothing\n").unwrap();
        assert!(WordListValidator::load(&path).is_err());
    }

    #[test]
    fn test_personal_dictionary_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("personal.txt");

        let mut v = english().with_personal_dictionary(path.clone()).unwrap();
        v.add_word("quire").unwrap();
        v.add_word("quire").unwrap();
        assert!(v.check("quire"));

        let reloaded = english().with_personal_dictionary(path.clone()).unwrap();
        assert!(reloaded.check("quire"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "quire\n");
    }

    #[test]
    fn test_failed_personal_write_does_not_accept_word() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be cannot be appended to
        let path = dir.path().join("personal.dic");
        fs::create_dir(&path).unwrap();

        let mut v = english().with_personal_dictionary(path).unwrap();
        assert!(v.add_word("quire").is_err());
        assert!(!v.check("quire"));
    }
}
