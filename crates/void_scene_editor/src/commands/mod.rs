//! Command pattern implementation for undo/redo support.
//!
//! Every attribute edit made while a session is active goes through the
//! command system.

mod attribute_commands;
mod command;

pub use attribute_commands::SetAttributesCommand;
pub use command::{Command, CommandError, CommandResult};

use void_scene::SceneStore;

use crate::core::UndoHistory;

/// Execute a command and add it to history.
///
/// A command that fails is dropped and the history is left untouched.
pub fn execute(scene: &mut SceneStore, history: &mut UndoHistory, mut cmd: Box<dyn Command>) -> CommandResult {
    cmd.execute(scene)?;
    history.push(cmd);
    Ok(())
}
