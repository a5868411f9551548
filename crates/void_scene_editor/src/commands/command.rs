//! Command trait and result types.

use thiserror::Error;
use void_scene::{EntityError, EntityId, SceneStore};

/// Result type for command execution.
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    /// The target entity refused the edit.
    #[error("Edit rejected by {id}: {source}")]
    Rejected {
        id: EntityId,
        #[source]
        source: EntityError,
    },
}

/// A command that can be executed, undone, and redone.
///
/// Commands are the only way attribute edits reach the scene once editing
/// is active. They capture both the edit and its inverse, enabling
/// undo/redo. A command whose target has been removed from the scene must
/// succeed without doing anything.
///
/// # Example
///
/// ```ignore
/// struct RenameCommand {
///     entity_id: EntityId,
///     old_name: String,
///     new_name: String,
/// }
///
/// impl Command for RenameCommand {
///     fn description(&self) -> &str { "Rename" }
///
///     fn execute(&mut self, scene: &mut SceneStore) -> CommandResult {
///         if let Some(entity) = scene.get_mut(self.entity_id) {
///             let delta = Attribute::Name(self.new_name.clone()).into();
///             entity.apply_partial(&delta)?;
///         }
///         Ok(())
///     }
///
///     fn undo(&mut self, scene: &mut SceneStore) -> CommandResult {
///         if let Some(entity) = scene.get_mut(self.entity_id) {
///             let delta = Attribute::Name(self.old_name.clone()).into();
///             entity.apply_partial(&delta)?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str;

    /// Entity this command edits, if any.
    fn target(&self) -> Option<EntityId> {
        None
    }

    /// Execute the command, modifying the scene.
    fn execute(&mut self, scene: &mut SceneStore) -> CommandResult;

    /// Undo the command, restoring the previous state.
    fn undo(&mut self, scene: &mut SceneStore) -> CommandResult;
}
