//! Void Scene Editor
//!
//! Attribute editing with undo/redo for `void_scene` entities.
//!
//! ## Features
//!
//! - **Commands**: every attribute edit is a reversible, snapshot-based command
//! - **Undo/Redo**: linear history with a cursor, optional size cap and save point
//! - **Echo suppression**: repopulating inspector fields never records an edit
//! - **Drag gestures**: a whole viewport drag is one undo step
//! - **Shell**: line-oriented front end over the same editor state
//!
//! ## Architecture
//!
//! ```text
//! Field commit ─> EditSession ─> SetAttributesCommand ─> SceneStore
//!                      │                  │
//!                      │                  └─> UndoHistory
//!                      └─ load_entity (echo suppressed) ─> InspectorFields
//! ```

pub mod commands;
pub mod core;
pub mod session;
pub mod shell;

// Re-export commonly used types
pub use self::core::{EditorPreferences, EditorState, PreferencesError, UndoHistory};

pub use commands::{Command, CommandError, CommandResult, SetAttributesCommand};

pub use session::{
    CommitOutcome,
    DragGesture,
    EchoGate,
    EchoGuard,
    EditSession,
    FieldBuffer,
    InspectorFields,
    NullFields,
    SessionError,
    SessionOptions,
};

pub use shell::{Shell, ShellReply};
