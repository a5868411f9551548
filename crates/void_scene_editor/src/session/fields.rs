//! Inspector field targets.

use void_scene::{EntitySnapshot, Rgba, ShapeKind};

/// Receives entity values for display.
///
/// Implemented by whatever UI hosts the inspector. The session only calls
/// these while its [`EchoGate`](super::EchoGate) is closed.
pub trait InspectorFields {
    /// Show every attribute of `snapshot`.
    fn populate(&mut self, snapshot: &EntitySnapshot);

    /// Show that nothing is selected.
    fn clear(&mut self);
}

/// Fields for headless use. Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFields;

impl InspectorFields for NullFields {
    fn populate(&mut self, _snapshot: &EntitySnapshot) {}

    fn clear(&mut self) {}
}

/// Plain value buffers mirroring the inspector widgets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldBuffer {
    pub name: String,
    pub color: Rgba,
    pub position: [f32; 3],
    /// `[w, x, y, z]`
    pub orientation: [f32; 4],
    pub dimensions: Vec<f32>,
    pub kind: Option<ShapeKind>,
}

impl FieldBuffer {
    /// True when no entity is shown.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}

impl InspectorFields for FieldBuffer {
    fn populate(&mut self, snapshot: &EntitySnapshot) {
        let q = snapshot.orientation;
        *self = Self {
            name: snapshot.name.clone(),
            color: snapshot.color,
            position: snapshot.position.to_array(),
            orientation: [q.w, q.x, q.y, q.z],
            dimensions: snapshot.dimensions.to_vec(),
            kind: Some(snapshot.kind),
        };
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_scene::{EntityId, SceneEntity, Shape, Vec3};

    #[test]
    fn test_buffer_populate_and_clear() {
        let entity = SceneEntity::new(EntityId(1), "Ball", Shape::sphere()).with_position(Vec3::new(1.0, 2.0, 3.0));
        let mut fields = FieldBuffer::default();
        assert!(fields.is_empty());

        fields.populate(&entity.snapshot());
        assert_eq!(fields.name, "Ball");
        assert_eq!(fields.position, [1.0, 2.0, 3.0]);
        assert_eq!(fields.orientation, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(fields.dimensions, vec![1.0]);
        assert_eq!(fields.kind, Some(ShapeKind::Sphere));

        fields.clear();
        assert!(fields.is_empty());
    }
}
