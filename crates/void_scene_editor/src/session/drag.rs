//! Viewport drag gestures.

use glam::Vec3;
use void_scene::{Attribute, EntityId, EntitySnapshot, SceneEntity};

use crate::commands::SetAttributesCommand;

/// An in-progress drag of one entity.
///
/// Intermediate positions are written straight to the entity. Only the
/// gesture as a whole becomes a command, built from the state at press time.
#[derive(Clone, Debug)]
pub struct DragGesture {
    entity_id: EntityId,
    start: EntitySnapshot,
}

impl DragGesture {
    pub fn begin(entity: &SceneEntity) -> Self {
        Self {
            entity_id: entity.id(),
            start: entity.snapshot(),
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn start_position(&self) -> Vec3 {
        self.start.position
    }

    /// The command recording this gesture, or `None` if nothing moved.
    pub fn into_command(self, end_position: Vec3) -> Option<SetAttributesCommand> {
        if end_position == self.start.position {
            return None;
        }
        Some(SetAttributesCommand::with_before(
            self.entity_id,
            self.start.to_delta(),
            Attribute::Position(end_position).into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use void_scene::Shape;

    #[test]
    fn test_no_motion_no_command() {
        let entity = SceneEntity::new(EntityId(1), "Cube1", Shape::cube());
        let gesture = DragGesture::begin(&entity);
        assert!(gesture.into_command(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_command_spans_gesture() {
        let entity = SceneEntity::new(EntityId(1), "Cube1", Shape::cube()).with_position(Vec3::X);
        let gesture = DragGesture::begin(&entity);
        assert_eq!(gesture.start_position(), Vec3::X);

        let cmd = gesture.into_command(Vec3::new(4.0, 1.0, 0.0)).unwrap();
        assert_eq!(cmd.description(), "Move");
        assert_eq!(cmd.before().position, Some(Vec3::X));
        assert_eq!(cmd.after().position, Some(Vec3::new(4.0, 1.0, 0.0)));
    }
}
