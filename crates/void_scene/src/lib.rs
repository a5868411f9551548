//! # void_scene - Editable Shape Scene
//!
//! The data model behind the scene editor: primitive entities (cubes,
//! spheres, imported meshes), their attribute sets, and the store that owns
//! them and persists them as JSON.
//!
//! ## Architecture
//!
//! ```text
//! SceneStore ──owns──> SceneEntity ──snapshot()──> EntitySnapshot
//!      │                    ▲
//!      │                    └── apply_partial(AttributeDelta)
//!      └── save_all / load_all ──> EntityRecord (JSON)
//! ```

pub mod entity;
pub mod error;
pub mod serializer;
pub mod store;

pub use entity::{
    Attribute,
    AttributeDelta,
    AttributeKey,
    Dimensions,
    EntityId,
    EntitySnapshot,
    Rgba,
    SceneEntity,
    Shape,
    ShapeKind,
    DEFAULT_COLOR,
    MESH_UNIT_SCALE,
};
pub use error::{EntityError, Result, SceneError};
pub use serializer::{EntityRecord, LoadContext, SceneSerializer, ShapeTag};
pub use store::{SceneStore, SpawnParams, StoreConfig};

pub use glam::{Quat, Vec3};
