//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/quire/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::editable::DEFAULT_CAPACITY;
use crate::spell::DEFAULT_MAX_SUGGESTIONS;

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Entries kept on each of the undo and redo stacks (0 = unbounded)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Whether misspelled words are highlighted
    #[serde(default = "default_spell_check")]
    pub spell_check: bool,

    /// Dictionary language (e.g., "en_US"), looked up in the dictionaries dir
    #[serde(default = "default_spell_language")]
    pub spell_language: String,

    /// Maximum number of suggestions offered for a misspelled word
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_spell_check() -> bool {
    true
}

fn default_spell_language() -> String {
    "en_US".to_string()
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            spell_check: default_spell_check(),
            spell_language: default_spell_language(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
