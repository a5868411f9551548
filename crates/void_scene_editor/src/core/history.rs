//! Undo/Redo history.
//!
//! A linear log of executed commands plus a cursor marking the last applied
//! one. Undo walks the cursor back, redo walks it forward, and pushing a new
//! command discards everything past the cursor.

use void_scene::SceneStore;

use crate::commands::{Command, CommandError};

/// Undo/redo history log.
pub struct UndoHistory {
    commands: Vec<Box<dyn Command>>,
    /// Number of commands currently applied. The cursor is `applied - 1`.
    applied: usize,
    /// Maximum history size, `None` for unbounded
    max_size: Option<usize>,
    /// `applied` at the last save, or `None` once that state is unreachable
    saved_at: Option<usize>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// History that keeps at most `max_size` commands.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_limit(Some(max_size))
    }

    pub fn with_limit(max_size: Option<usize>) -> Self {
        Self {
            commands: Vec::new(),
            applied: 0,
            max_size: max_size.map(|max| max.max(1)),
            saved_at: Some(0),
        }
    }

    /// Index of the last applied command, `None` when nothing is applied.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Number of commands in the log, applied or not.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Check if there are commands to undo.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Check if there are commands to redo.
    pub fn can_redo(&self) -> bool {
        self.applied < self.commands.len()
    }

    /// Get the description of the next undo command.
    pub fn undo_description(&self) -> Option<&str> {
        self.cursor().map(|i| self.commands[i].description())
    }

    /// Get the description of the next redo command.
    pub fn redo_description(&self) -> Option<&str> {
        self.commands.get(self.applied).map(|c| c.description())
    }

    /// Descriptions of every logged command with whether it is applied.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.commands
            .iter()
            .enumerate()
            .map(move |(i, c)| (c.description(), i < self.applied))
    }

    /// Push a command that has already been executed.
    ///
    /// Commands past the cursor are discarded first. When a bounded log is
    /// full the oldest command is dropped.
    pub fn push(&mut self, cmd: Box<dyn Command>) {
        self.commands.truncate(self.applied);
        if self.saved_at.is_some_and(|saved| saved > self.applied) {
            self.saved_at = None;
        }

        self.commands.push(cmd);
        self.applied = self.commands.len();

        let Some(max_size) = self.max_size else {
            return;
        };
        while self.commands.len() > max_size {
            self.commands.remove(0);
            self.applied -= 1;
            self.saved_at = self.saved_at.and_then(|saved| saved.checked_sub(1));
        }
    }

    /// Undo the command at the cursor.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the command
    /// fails the cursor does not move.
    pub fn undo(&mut self, scene: &mut SceneStore) -> Result<bool, CommandError> {
        let Some(index) = self.cursor() else {
            return Ok(false);
        };
        self.commands[index].undo(scene)?;
        self.applied = index;
        Ok(true)
    }

    /// Re-execute the command just past the cursor.
    pub fn redo(&mut self, scene: &mut SceneStore) -> Result<bool, CommandError> {
        let Some(cmd) = self.commands.get_mut(self.applied) else {
            return Ok(false);
        };
        cmd.execute(scene)?;
        self.applied += 1;
        Ok(true)
    }

    /// Whether the applied state differs from the one last marked saved.
    pub fn is_dirty(&self) -> bool {
        self.saved_at != Some(self.applied)
    }

    /// Mark the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved_at = Some(self.applied);
    }

    /// Clear all history. The empty state counts as saved.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.applied = 0;
        self.saved_at = Some(0);
    }
}
