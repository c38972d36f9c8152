//! quire - edit-session core for a text editor
//!
//! This crate provides the undo/redo mutation log and the incremental
//! spell re-validation engine that back every open editing session.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod session;
pub mod spell;
pub mod tracing;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editable::{Edit, EditEvent, MutationLog};
pub use session::{EditSession, SessionEvent};
