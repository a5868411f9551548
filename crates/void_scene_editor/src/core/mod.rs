//! Core editor types and state management.
//!
//! This module contains the central `EditorState` and supporting types
//! that form the foundation of the editor.

pub mod editor_state;
mod history;
mod preferences;

pub use editor_state::EditorState;
pub use history::UndoHistory;
pub use preferences::{EditorPreferences, PreferencesError};
