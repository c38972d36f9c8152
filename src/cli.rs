//! Command-line argument parsing
//!
//! Supports:
//! - Spell-checking a file with a dictionary file or a configured language
//! - Overriding history capacity and disabling spell checking

use clap::Parser;
use std::path::PathBuf;

use crate::config::EditorConfig;

/// Spell-check a text file line by line
#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Spell-check a text file line by line")]
pub struct CliArgs {
    /// File to open
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Word list to check against (overrides --language)
    #[arg(short = 'd', long, value_name = "PATH")]
    pub dictionary: Option<PathBuf>,

    /// Dictionary language, looked up in the config dictionaries directory
    #[arg(short = 'l', long, value_name = "LANG")]
    pub language: Option<String>,

    /// Undo/redo entries kept per stack (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub history_capacity: Option<usize>,

    /// Open the file without spell checking
    #[arg(long)]
    pub no_spell: bool,
}

/// Where the word list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    File(PathBuf),
    Language(String),
}

/// Configuration derived from CLI arguments on top of the saved config
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub file: PathBuf,
    pub editor: EditorConfig,
    /// None when spell checking is off
    pub dictionary: Option<DictionarySource>,
}

impl CliArgs {
    /// Merge parsed CLI args into the loaded editor config
    pub fn into_config(self, mut editor: EditorConfig) -> StartupConfig {
        if let Some(capacity) = self.history_capacity {
            editor.history_capacity = capacity;
        }
        if let Some(language) = self.language {
            editor.spell_language = language;
        }
        if self.no_spell {
            editor.spell_check = false;
        }

        let dictionary = if !editor.spell_check {
            None
        } else if let Some(path) = self.dictionary {
            Some(DictionarySource::File(path))
        } else {
            Some(DictionarySource::Language(editor.spell_language.clone()))
        };

        StartupConfig {
            file: self.file,
            editor,
            dictionary,
        }
    }
}
