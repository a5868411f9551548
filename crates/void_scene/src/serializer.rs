//! Scene serialization to/from JSON format.
//!
//! A scene file is a flat list of entity records:
//!
//! ```json
//! [
//!   {
//!     "name": "Cube1",
//!     "color": [178, 178, 178, 255],
//!     "position": [0.0, 0.0, 0.0],
//!     "orientation": [1.0, 0.0, 0.0, 0.0],
//!     "shape": "Cube",
//!     "dimensions": [1.0, 1.0, 1.0]
//!   }
//! ]
//! ```
//!
//! Orientation is stored scalar-first. `source` is only written for `"STL"`
//! records and always holds an absolute path.

use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::entity::{Dimensions, EntityId, Rgba, SceneEntity, Shape, ShapeKind};
use crate::error::{Result, SceneError};

/// Shape tag as written in scene files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeTag {
    #[serde(alias = "cube", alias = "CUBE")]
    Cube,
    #[serde(alias = "sphere", alias = "SPHERE")]
    Sphere,
    #[serde(rename = "STL", alias = "stl", alias = "Stl")]
    Stl,
}

impl From<ShapeKind> for ShapeTag {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Cube => ShapeTag::Cube,
            ShapeKind::Sphere => ShapeTag::Sphere,
            ShapeKind::ImportedMesh => ShapeTag::Stl,
        }
    }
}

impl From<ShapeTag> for ShapeKind {
    fn from(tag: ShapeTag) -> Self {
        match tag {
            ShapeTag::Cube => ShapeKind::Cube,
            ShapeTag::Sphere => ShapeKind::Sphere,
            ShapeTag::Stl => ShapeKind::ImportedMesh,
        }
    }
}

/// Entity data for serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    pub color: Rgba,
    pub position: [f32; 3],
    /// `[w, x, y, z]`
    pub orientation: [f32; 4],
    pub shape: ShapeTag,
    pub dimensions: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

/// Where relative mesh paths in a scene file are resolved from.
#[derive(Clone, Debug, Default)]
pub struct LoadContext {
    pub base_dir: PathBuf,
}

impl LoadContext {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolves relative sources against the directory holding `scene_file`.
    pub fn for_scene_file(scene_file: &Path) -> Self {
        Self::new(scene_file.parent().map(Path::to_path_buf).unwrap_or_default())
    }

    /// Joins `path` onto the base directory and makes it absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        std::path::absolute(&joined).unwrap_or(joined)
    }
}

impl SceneEntity {
    /// Flattens this entity into its persisted form.
    pub fn to_record(&self) -> EntityRecord {
        let position = self.position();
        let orientation = self.orientation();
        EntityRecord {
            name: self.name().to_string(),
            color: self.color(),
            position: position.to_array(),
            orientation: [orientation.w, orientation.x, orientation.y, orientation.z],
            shape: ShapeTag::from(self.kind()),
            dimensions: self.shape().dimensions().to_vec(),
            source: self.shape().source().map(Path::to_path_buf),
        }
    }

    /// Rebuilds an entity from a persisted record.
    ///
    /// Imported meshes must reference an existing file; otherwise this fails
    /// with [`SceneError::AssetMissing`].
    pub fn from_record(id: EntityId, record: EntityRecord, ctx: &LoadContext) -> Result<Self> {
        let kind = ShapeKind::from(record.shape);
        let dimensions = Dimensions::from_slice(kind, &record.dimensions).ok_or_else(|| {
            SceneError::InvalidRecord(format!(
                "'{}': {} expects {} dimension(s), found {}",
                record.name,
                kind,
                kind.dimension_count(),
                record.dimensions.len()
            ))
        })?;

        let shape = match dimensions {
            Dimensions::Cube { extents } => Shape::Cube { extents },
            Dimensions::Sphere { radius } => Shape::Sphere { radius },
            Dimensions::Mesh { size } => {
                let source = record.source.as_deref().ok_or_else(|| {
                    SceneError::InvalidRecord(format!("'{}': STL record without source", record.name))
                })?;
                let path = ctx.resolve(source);
                if !path.exists() {
                    return Err(SceneError::AssetMissing {
                        name: record.name,
                        path,
                    });
                }
                Shape::ImportedMesh { source: path, size }
            }
        };

        let [w, x, y, z] = record.orientation;
        Ok(SceneEntity::new(id, record.name, shape)
            .with_color(record.color)
            .with_position(Vec3::from(record.position))
            .with_orientation(Quat::from_xyzw(x, y, z, w)))
    }
}

/// Scene serializer for save/load operations.
pub struct SceneSerializer;

impl SceneSerializer {
    /// Write records to `path`, replacing any existing file.
    pub fn save(records: &[EntityRecord], path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read the top-level record list without decoding individual records.
    pub fn read(path: &Path) -> Result<Vec<serde_json::Value>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn decode(value: serde_json::Value) -> Result<EntityRecord> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_layout() {
        let entity = SceneEntity::new(EntityId(1), "Sphere1", Shape::sphere())
            .with_position(Vec3::new(3.0, 0.0, 0.0));
        let value = serde_json::to_value(entity.to_record()).unwrap();

        assert_eq!(value["shape"], json!("Sphere"));
        assert_eq!(value["dimensions"], json!([1.0]));
        assert_eq!(value["orientation"], json!([1.0, 0.0, 0.0, 0.0]));
        assert_eq!(value["color"], json!([178, 178, 178, 255]));
        assert!(value.get("source").is_none());
    }

    #[test]
    fn test_mesh_tag_is_stl() {
        let entity = SceneEntity::new(EntityId(1), "STL1", Shape::imported_mesh("/tmp/car.stl"));
        let value = serde_json::to_value(entity.to_record()).unwrap();
        assert_eq!(value["shape"], json!("STL"));
        assert_eq!(value["source"], json!("/tmp/car.stl"));
    }

    #[test]
    fn test_shape_tag_case_insensitive() {
        let tag: ShapeTag = serde_json::from_value(json!("cube")).unwrap();
        assert_eq!(tag, ShapeTag::Cube);
        let tag: ShapeTag = serde_json::from_value(json!("stl")).unwrap();
        assert_eq!(tag, ShapeTag::Stl);
    }

    #[test]
    fn test_from_record_restores_orientation_order() {
        let record = EntityRecord {
            name: "Cube1".into(),
            color: [1, 2, 3, 4],
            position: [1.0, 2.0, 3.0],
            orientation: [0.5, 0.5, 0.5, 0.5],
            shape: ShapeTag::Cube,
            dimensions: vec![2.0, 2.0, 2.0],
            source: None,
        };
        let entity = SceneEntity::from_record(EntityId(7), record.clone(), &LoadContext::default()).unwrap();

        assert_eq!(entity.id(), EntityId(7));
        assert_eq!(entity.orientation(), Quat::from_xyzw(0.5, 0.5, 0.5, 0.5));
        assert_eq!(entity.to_record(), record);
    }

    #[test]
    fn test_from_record_rejects_wrong_arity() {
        let record = EntityRecord {
            name: "Ball".into(),
            color: [0, 0, 0, 255],
            position: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0],
            shape: ShapeTag::Sphere,
            dimensions: vec![1.0, 1.0, 1.0],
            source: None,
        };
        let err = SceneEntity::from_record(EntityId(1), record, &LoadContext::default()).unwrap_err();
        assert!(matches!(err, SceneError::InvalidRecord(_)));
    }

    #[test]
    fn test_from_record_missing_asset() {
        let record = EntityRecord {
            name: "Car".into(),
            color: [0, 0, 0, 255],
            position: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0],
            shape: ShapeTag::Stl,
            dimensions: vec![1.0, 1.0, 1.0],
            source: Some(PathBuf::from("/definitely/not/here/car.stl")),
        };
        let err = SceneEntity::from_record(EntityId(1), record, &LoadContext::default()).unwrap_err();
        match err {
            SceneError::AssetMissing { name, path } => {
                assert_eq!(name, "Car");
                assert_eq!(path, PathBuf::from("/definitely/not/here/car.stl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let ctx = LoadContext::new("/scenes/demo");
        assert_eq!(ctx.resolve(Path::new("car.stl")), PathBuf::from("/scenes/demo/car.stl"));
        assert_eq!(ctx.resolve(Path::new("/abs/car.stl")), PathBuf::from("/abs/car.stl"));
    }
}
