//! Attribute edit command.

use void_scene::{AttributeDelta, AttributeKey, EntityId, SceneEntity, SceneStore};

use super::{Command, CommandError, CommandResult};

/// Sets a group of attributes on one entity, remembering the full prior state.
///
/// `before` is a snapshot of every attribute, so undo restores the entity
/// exactly even if later edits touched other fields. Both directions are
/// no-ops once the target has been deleted.
pub struct SetAttributesCommand {
    pub entity_id: EntityId,
    before: AttributeDelta,
    after: AttributeDelta,
    description: &'static str,
}

impl SetAttributesCommand {
    /// Captures `entity`'s current attributes as the undo state.
    pub fn new(entity: &SceneEntity, after: AttributeDelta) -> Self {
        Self::with_before(entity.id(), entity.snapshot().to_delta(), after)
    }

    /// Uses an explicit undo state, e.g. one captured before a drag started.
    pub fn with_before(entity_id: EntityId, before: AttributeDelta, after: AttributeDelta) -> Self {
        Self {
            entity_id,
            description: describe(&after),
            before,
            after,
        }
    }

    pub fn before(&self) -> &AttributeDelta {
        &self.before
    }

    pub fn after(&self) -> &AttributeDelta {
        &self.after
    }
}

impl Command for SetAttributesCommand {
    fn description(&self) -> &str {
        self.description
    }

    fn target(&self) -> Option<EntityId> {
        Some(self.entity_id)
    }

    fn execute(&mut self, scene: &mut SceneStore) -> CommandResult {
        apply_delta(scene, self.entity_id, &self.after)
    }

    fn undo(&mut self, scene: &mut SceneStore) -> CommandResult {
        apply_delta(scene, self.entity_id, &self.before)
    }
}

fn apply_delta(scene: &mut SceneStore, id: EntityId, delta: &AttributeDelta) -> CommandResult {
    match scene.get_mut(id) {
        Some(entity) => entity
            .apply_partial(delta)
            .map_err(|source| CommandError::Rejected { id, source }),
        None => {
            log::debug!("{} no longer exists, skipping edit", id);
            Ok(())
        }
    }
}

fn describe(delta: &AttributeDelta) -> &'static str {
    match delta.keys().as_slice() {
        [AttributeKey::Name] => "Rename",
        [AttributeKey::Color] => "Change Color",
        [AttributeKey::Position] => "Move",
        [AttributeKey::Orientation] => "Rotate",
        [AttributeKey::Dimensions] => "Resize",
        _ => "Edit Attributes",
    }
}
