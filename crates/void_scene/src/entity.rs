//! Scene entities and their attribute sets.
//!
//! An entity is only ever changed through an [`AttributeDelta`], a partial
//! update naming exactly the fields that change. [`EntitySnapshot`] is the
//! full read-out used for undo and for populating inspector fields.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::{Mat4, Quat, Vec3};

use crate::error::EntityError;

/// Converts the visible size of an imported mesh into its render scale.
pub const MESH_UNIT_SCALE: f32 = 0.01;

/// Diffuse color given to newly spawned entities.
pub const DEFAULT_COLOR: Rgba = [178, 178, 178, 255];

/// RGBA color, one byte per channel.
pub type Rgba = [u8; 4];

/// Stable entity identifier. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Kind of primitive an entity renders as. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Sphere,
    ImportedMesh,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::ImportedMesh => "STL",
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[ShapeKind::Cube, ShapeKind::Sphere, ShapeKind::ImportedMesh]
    }

    /// Number of values in this kind's dimensions vector.
    pub fn dimension_count(&self) -> usize {
        match self {
            ShapeKind::Sphere => 1,
            ShapeKind::Cube | ShapeKind::ImportedMesh => 3,
        }
    }

    pub fn default_dimensions(&self) -> Dimensions {
        match self {
            ShapeKind::Cube => Dimensions::Cube { extents: [1.0; 3] },
            ShapeKind::Sphere => Dimensions::Sphere { radius: 1.0 },
            ShapeKind::ImportedMesh => Dimensions::Mesh { size: [1.0; 3] },
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific size of an entity, in the units the user edits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dimensions {
    Cube { extents: [f32; 3] },
    Sphere { radius: f32 },
    /// Size of an imported mesh in the asset's natural units.
    Mesh { size: [f32; 3] },
}

impl Dimensions {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Dimensions::Cube { .. } => ShapeKind::Cube,
            Dimensions::Sphere { .. } => ShapeKind::Sphere,
            Dimensions::Mesh { .. } => ShapeKind::ImportedMesh,
        }
    }

    pub fn to_vec(&self) -> Vec<f32> {
        match self {
            Dimensions::Cube { extents } => extents.to_vec(),
            Dimensions::Sphere { radius } => vec![*radius],
            Dimensions::Mesh { size } => size.to_vec(),
        }
    }

    /// Builds dimensions for `kind` from a flat vector.
    ///
    /// Returns `None` unless `values` has exactly the arity the kind expects.
    pub fn from_slice(kind: ShapeKind, values: &[f32]) -> Option<Self> {
        match (kind, values) {
            (ShapeKind::Cube, &[x, y, z]) => Some(Dimensions::Cube { extents: [x, y, z] }),
            (ShapeKind::Sphere, &[radius]) => Some(Dimensions::Sphere { radius }),
            (ShapeKind::ImportedMesh, &[x, y, z]) => Some(Dimensions::Mesh { size: [x, y, z] }),
            _ => None,
        }
    }
}

/// Geometry of an entity: its immutable kind plus the kind's payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Cube { extents: [f32; 3] },
    Sphere { radius: f32 },
    ImportedMesh { source: PathBuf, size: [f32; 3] },
}

impl Shape {
    pub fn cube() -> Self {
        Shape::Cube { extents: [1.0; 3] }
    }

    pub fn sphere() -> Self {
        Shape::Sphere { radius: 1.0 }
    }

    pub fn imported_mesh(source: impl Into<PathBuf>) -> Self {
        Shape::ImportedMesh {
            source: source.into(),
            size: [1.0; 3],
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Cube { .. } => ShapeKind::Cube,
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::ImportedMesh { .. } => ShapeKind::ImportedMesh,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        match self {
            Shape::Cube { extents } => Dimensions::Cube { extents: *extents },
            Shape::Sphere { radius } => Dimensions::Sphere { radius: *radius },
            Shape::ImportedMesh { size, .. } => Dimensions::Mesh { size: *size },
        }
    }

    /// Mesh file backing an imported shape.
    pub fn source(&self) -> Option<&Path> {
        match self {
            Shape::ImportedMesh { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Scale applied to the unit primitive when rendering.
    ///
    /// Imported meshes are scaled by [`MESH_UNIT_SCALE`]; the visible size
    /// stays in asset units.
    pub fn render_scale(&self) -> Vec3 {
        match self {
            Shape::Cube { extents } => Vec3::from(*extents),
            Shape::Sphere { radius } => Vec3::splat(*radius),
            Shape::ImportedMesh { size, .. } => Vec3::from(*size) * MESH_UNIT_SCALE,
        }
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<(), EntityError> {
        match (self, dimensions) {
            (Shape::Cube { extents }, Dimensions::Cube { extents: new }) => *extents = new,
            (Shape::Sphere { radius }, Dimensions::Sphere { radius: new }) => *radius = new,
            (Shape::ImportedMesh { size, .. }, Dimensions::Mesh { size: new }) => *size = new,
            (shape, given) => {
                return Err(EntityError::DimensionsMismatch {
                    shape: shape.kind(),
                    given: given.kind(),
                })
            }
        }
        Ok(())
    }
}

/// Key of a single updatable attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Name,
    Color,
    Position,
    Orientation,
    Dimensions,
}

impl AttributeKey {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKey::Name => "name",
            AttributeKey::Color => "color",
            AttributeKey::Position => "position",
            AttributeKey::Orientation => "orientation",
            AttributeKey::Dimensions => "dimensions",
        }
    }

    pub fn all() -> &'static [AttributeKey] {
        &[
            AttributeKey::Name,
            AttributeKey::Color,
            AttributeKey::Position,
            AttributeKey::Orientation,
            AttributeKey::Dimensions,
        ]
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single attribute value, as committed by one field group.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Name(String),
    Color(Rgba),
    Position(Vec3),
    Orientation(Quat),
    Dimensions(Dimensions),
}

impl Attribute {
    pub fn key(&self) -> AttributeKey {
        match self {
            Attribute::Name(_) => AttributeKey::Name,
            Attribute::Color(_) => AttributeKey::Color,
            Attribute::Position(_) => AttributeKey::Position,
            Attribute::Orientation(_) => AttributeKey::Orientation,
            Attribute::Dimensions(_) => AttributeKey::Dimensions,
        }
    }
}

/// Partial attribute update. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDelta {
    pub name: Option<String>,
    pub color: Option<Rgba>,
    pub position: Option<Vec3>,
    pub orientation: Option<Quat>,
    pub dimensions: Option<Dimensions>,
}

impl AttributeDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: Attribute) -> Self {
        self.set(attribute);
        self
    }

    pub fn set(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Name(name) => self.name = Some(name),
            Attribute::Color(color) => self.color = Some(color),
            Attribute::Position(position) => self.position = Some(position),
            Attribute::Orientation(orientation) => self.orientation = Some(orientation),
            Attribute::Dimensions(dimensions) => self.dimensions = Some(dimensions),
        }
    }

    pub fn get(&self, key: AttributeKey) -> Option<Attribute> {
        match key {
            AttributeKey::Name => self.name.clone().map(Attribute::Name),
            AttributeKey::Color => self.color.map(Attribute::Color),
            AttributeKey::Position => self.position.map(Attribute::Position),
            AttributeKey::Orientation => self.orientation.map(Attribute::Orientation),
            AttributeKey::Dimensions => self.dimensions.map(Attribute::Dimensions),
        }
    }

    /// Keys present in this delta, in declaration order.
    pub fn keys(&self) -> Vec<AttributeKey> {
        AttributeKey::all()
            .iter()
            .copied()
            .filter(|key| self.contains(*key))
            .collect()
    }

    pub fn contains(&self, key: AttributeKey) -> bool {
        match key {
            AttributeKey::Name => self.name.is_some(),
            AttributeKey::Color => self.color.is_some(),
            AttributeKey::Position => self.position.is_some(),
            AttributeKey::Orientation => self.orientation.is_some(),
            AttributeKey::Dimensions => self.dimensions.is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Attribute> for AttributeDelta {
    fn from(attribute: Attribute) -> Self {
        Self::new().with(attribute)
    }
}

/// Full read-out of an entity's attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub name: String,
    pub color: Rgba,
    pub position: Vec3,
    pub orientation: Quat,
    pub dimensions: Dimensions,
    pub kind: ShapeKind,
    pub source: Option<PathBuf>,
}

impl EntitySnapshot {
    /// Every updatable attribute as a delta. Applying it restores this snapshot.
    pub fn to_delta(&self) -> AttributeDelta {
        AttributeDelta {
            name: Some(self.name.clone()),
            color: Some(self.color),
            position: Some(self.position),
            orientation: Some(self.orientation),
            dimensions: Some(self.dimensions),
        }
    }

    pub fn attribute(&self, key: AttributeKey) -> Attribute {
        match key {
            AttributeKey::Name => Attribute::Name(self.name.clone()),
            AttributeKey::Color => Attribute::Color(self.color),
            AttributeKey::Position => Attribute::Position(self.position),
            AttributeKey::Orientation => Attribute::Orientation(self.orientation),
            AttributeKey::Dimensions => Attribute::Dimensions(self.dimensions),
        }
    }
}

/// One editable object in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEntity {
    id: EntityId,
    name: String,
    color: Rgba,
    position: Vec3,
    orientation: Quat,
    shape: Shape,
}

impl SceneEntity {
    pub fn new(id: EntityId, name: impl Into<String>, shape: Shape) -> Self {
        Self {
            id,
            name: name.into(),
            color: DEFAULT_COLOR,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            shape,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            name: self.name.clone(),
            color: self.color,
            position: self.position,
            orientation: self.orientation,
            dimensions: self.shape.dimensions(),
            kind: self.shape.kind(),
            source: self.shape.source().map(Path::to_path_buf),
        }
    }

    /// Overwrites every attribute present in `delta`.
    ///
    /// The delta is validated before anything is written, so a rejected
    /// delta leaves the entity untouched.
    pub fn apply_partial(&mut self, delta: &AttributeDelta) -> Result<(), EntityError> {
        if let Some(dimensions) = &delta.dimensions {
            if dimensions.kind() != self.kind() {
                return Err(EntityError::DimensionsMismatch {
                    shape: self.kind(),
                    given: dimensions.kind(),
                });
            }
        }

        if let Some(name) = &delta.name {
            self.name.clone_from(name);
        }
        if let Some(color) = delta.color {
            self.color = color;
        }
        if let Some(position) = delta.position {
            self.position = position;
        }
        if let Some(orientation) = delta.orientation {
            self.orientation = orientation;
        }
        if let Some(dimensions) = delta.dimensions {
            self.shape.set_dimensions(dimensions)?;
        }
        Ok(())
    }

    /// World matrix handed to the renderer.
    pub fn model_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.shape.render_scale(), self.orientation, self.position)
    }
}
