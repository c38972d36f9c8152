use anyhow::{Context, Result};
use clap::Parser;

use quire::cli::{CliArgs, DictionarySource, StartupConfig};
use quire::config::EditorConfig;
use quire::config_paths;
use quire::editable::TextBuffer;
use quire::session::{EditSession, SessionEvent};
use quire::spell::{WordListValidator, WordValidator};

fn main() -> Result<()> {
    quire::tracing::init();

    let args = CliArgs::parse();
    let startup = args.into_config(EditorConfig::load());

    let mut session = EditSession::from_file(&startup.file, &startup.editor)?;

    let Some(source) = startup.dictionary.clone() else {
        tracing::info!("Spell checking disabled");
        return Ok(());
    };
    let loaded = session.load_validator(|| load_validator(&source, &startup));
    for event in session.drain_events() {
        if let SessionEvent::ValidatorUnavailable(reason) = event {
            eprintln!("Spell checking unavailable: {reason}");
        }
    }
    loaded?;

    // No host loop here: drive the idle task to completion
    let lines = session.run_until_idle(usize::MAX);
    tracing::debug!("Validated {} lines", lines);

    let path = startup.file.display();
    let suspects = session.suspect_words();
    for (range, word) in &suspects {
        let (line, column) = session.buffer().offset_to_position(range.start);
        let suggestions = session.suggestions_at(range.start);
        if suggestions.is_empty() {
            println!("{path}:{}:{}: {word}", line + 1, column + 1);
        } else {
            println!(
                "{path}:{}:{}: {word} -> {}",
                line + 1,
                column + 1,
                suggestions.join(", ")
            );
        }
    }

    if suspects.is_empty() {
        tracing::info!("No misspelled words in {}", path);
    }
    Ok(())
}

fn load_validator(
    source: &DictionarySource,
    startup: &StartupConfig,
) -> Result<Box<dyn WordValidator>> {
    let validator = match source {
        DictionarySource::File(path) => WordListValidator::load(path)?,
        DictionarySource::Language(language) => {
            let dir = config_paths::dictionaries_dir()
                .context("No config directory available to look up dictionaries")?;
            WordListValidator::load_language(&dir, language)?
        }
    };

    let validator = match config_paths::personal_dictionary_file() {
        Some(personal) => validator.with_personal_dictionary(personal)?,
        None => validator,
    };
    Ok(Box::new(
        validator.with_max_suggestions(startup.editor.max_suggestions),
    ))
}
