//! Central editor state - single source of truth.
//!
//! Owns the scene, the edit session and the preferences. Attribute edits go
//! through the session so they land in the undo history; adding and deleting
//! entities is not undoable.

use std::path::PathBuf;

use glam::Vec3;
use void_scene::{Attribute, EntityId, SceneEntity, SceneError, SceneStore, ShapeKind, SpawnParams};

use super::EditorPreferences;
use crate::session::{CommitOutcome, EditSession, InspectorFields, SessionError, SessionOptions};

/// Central editor state.
pub struct EditorState<F: InspectorFields> {
    // Scene data
    pub scene: SceneStore,

    // Editing
    session: EditSession<F>,

    // Scene file
    pub scene_path: PathBuf,
    /// Structural changes the history does not track
    scene_modified: bool,

    // Preferences
    pub preferences: EditorPreferences,

    // Status message
    pub status_message: String,
}

impl<F: InspectorFields> EditorState<F> {
    /// Empty scene, nothing loaded from disk.
    pub fn new(preferences: EditorPreferences, fields: F) -> Self {
        let options = SessionOptions {
            history_limit: preferences.history_limit,
            normalize_orientation: preferences.normalize_orientation,
        };
        Self {
            scene: SceneStore::new(preferences.store_config()),
            session: EditSession::new(fields, options),
            scene_path: preferences.scene_file.clone(),
            scene_modified: false,
            preferences,
            status_message: "Ready".to_string(),
        }
    }

    /// Create the editor and load the configured scene file.
    pub fn open(preferences: EditorPreferences, fields: F) -> Self {
        let mut state = Self::new(preferences, fields);
        state.reload();
        state
    }

    /// Set the status bar message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub fn session(&self) -> &EditSession<F> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession<F> {
        &mut self.session
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.session.selected()
    }

    pub fn selected_entity(&self) -> Option<&SceneEntity> {
        self.selected().and_then(|id| self.scene.get(id))
    }

    /// Spawn a new entity. Selection is left alone.
    pub fn add_shape(&mut self, kind: ShapeKind, params: SpawnParams) -> Result<EntityId, SceneError> {
        match self.scene.add(kind, params) {
            Ok(id) => {
                self.scene_modified = true;
                self.set_status(format!("Added {}", self.scene.get(id).map_or("entity", SceneEntity::name)));
                Ok(id)
            }
            Err(e) => {
                log::warn!("Could not add {}: {}", kind, e);
                self.set_status(format!("Could not add {}: {}", kind, e));
                Err(e)
            }
        }
    }

    pub fn select(&mut self, id: Option<EntityId>) -> Result<(), SessionError> {
        self.session.select(&mut self.scene, id)
    }

    /// Delete an entity. Commands that target it stay in the history as no-ops.
    pub fn delete(&mut self, id: EntityId) -> Option<SceneEntity> {
        let entity = self.scene.remove(id)?;
        self.session.entity_removed(&self.scene, id);
        self.scene_modified = true;
        self.set_status(format!("Deleted {}", entity.name()));
        Some(entity)
    }

    /// Delete the selected entity.
    pub fn delete_selected(&mut self) -> Option<SceneEntity> {
        let id = self.selected()?;
        self.delete(id)
    }

    /// Commit one attribute of the selected entity.
    pub fn commit(&mut self, attribute: Attribute) -> Result<CommitOutcome, SessionError> {
        let key = attribute.key();
        let outcome = self.session.on_field_committed(&mut self.scene, attribute);
        match &outcome {
            Ok(CommitOutcome::Applied) => self.set_status(format!("Set {}", key)),
            Ok(CommitOutcome::Unchanged) => self.set_status(format!("{} unchanged", key)),
            Ok(CommitOutcome::Suppressed) => {}
            Err(e) => self.set_status(format!("Cannot set {}: {}", key, e)),
        }
        outcome
    }

    /// Undo the last command.
    pub fn undo(&mut self) -> bool {
        let desc = self.session.history().undo_description().map(str::to_string);
        match self.session.undo(&mut self.scene) {
            Ok(true) => {
                let desc = desc.unwrap_or_default();
                log::info!("Undo: {}", desc);
                self.set_status(format!("Undo: {}", desc));
                true
            }
            Ok(false) => {
                self.set_status("Nothing to undo");
                false
            }
            Err(e) => {
                log::error!("Undo failed: {}", e);
                self.set_status(format!("Undo failed: {}", e));
                false
            }
        }
    }

    /// Redo the last undone command.
    pub fn redo(&mut self) -> bool {
        let desc = self.session.history().redo_description().map(str::to_string);
        match self.session.redo(&mut self.scene) {
            Ok(true) => {
                let desc = desc.unwrap_or_default();
                log::info!("Redo: {}", desc);
                self.set_status(format!("Redo: {}", desc));
                true
            }
            Ok(false) => {
                self.set_status("Nothing to redo");
                false
            }
            Err(e) => {
                log::error!("Redo failed: {}", e);
                self.set_status(format!("Redo failed: {}", e));
                false
            }
        }
    }

    pub fn drag_by(&mut self, delta: Vec3) -> Result<(), SessionError> {
        self.session.drag_by(&mut self.scene, delta)
    }

    /// Release the drag. Returns whether a command was recorded.
    pub fn end_drag(&mut self) -> Result<bool, SessionError> {
        let recorded = self.session.end_drag(&mut self.scene)?;
        if recorded {
            self.set_status("Moved");
        }
        Ok(recorded)
    }

    pub fn cancel_drag(&mut self) -> Result<(), SessionError> {
        self.session.cancel_drag(&mut self.scene)
    }

    /// Write the scene to [`scene_path`](Self::scene_path).
    pub fn save(&mut self) -> Result<(), SceneError> {
        if let Err(e) = self.session.end_drag(&mut self.scene) {
            log::warn!("Could not record drag before saving: {}", e);
        }
        self.scene.save_all(&self.scene_path)?;
        self.mark_saved();
        self.set_status(format!("Saved {}", self.scene_path.display()));
        Ok(())
    }

    /// Replace the scene with the contents of the scene file.
    ///
    /// History and selection are dropped. Returns the number of entities loaded.
    pub fn reload(&mut self) -> usize {
        let loaded = self.scene.load_all(&self.scene_path).len();
        self.session.reset(&self.scene);
        self.scene_modified = false;
        self.set_status(format!("Loaded {} entities", loaded));
        loaded
    }

    /// Called once when the editor closes.
    pub fn shutdown(&mut self) -> Result<(), SceneError> {
        if self.preferences.save_on_exit {
            self.save()?;
        }
        Ok(())
    }

    /// Check if the scene has been modified.
    pub fn is_modified(&self) -> bool {
        self.scene_modified || self.session.history().is_dirty()
    }

    /// Mark the scene as saved.
    pub fn mark_saved(&mut self) {
        self.scene_modified = false;
        self.session.mark_saved();
    }
}
