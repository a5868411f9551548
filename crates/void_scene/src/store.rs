//! Authoritative entity collection and its persistence.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::entity::{EntityId, SceneEntity, Shape, ShapeKind};
use crate::error::{Result, SceneError};
use crate::serializer::{EntityRecord, LoadContext, SceneSerializer};

/// Settings used when spawning new entities.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Distance along X between consecutively spawned entities.
    pub spawn_spacing: f32,
    /// Mesh used for imported shapes when no source is given.
    pub default_mesh: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            spawn_spacing: 3.0,
            default_mesh: PathBuf::from("stl/car.stl"),
        }
    }
}

/// Optional overrides for [`SceneStore::add`].
#[derive(Clone, Debug, Default)]
pub struct SpawnParams {
    pub name: Option<String>,
    pub source: Option<PathBuf>,
    pub position: Option<Vec3>,
}

impl SpawnParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }
}

/// Owns every live entity, keyed by [`EntityId`], in insertion order.
#[derive(Debug)]
pub struct SceneStore {
    entities: Vec<SceneEntity>,
    entity_map: HashMap<EntityId, usize>,
    next_entity_id: u32,
    config: StoreConfig,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl SceneStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            entities: Vec::new(),
            entity_map: HashMap::new(),
            next_entity_id: 1,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Generate the next entity ID.
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        id
    }

    /// Create a new entity with kind-appropriate defaults.
    ///
    /// Entities are staggered along X so new ones do not overlap. Imported
    /// meshes fail with [`SceneError::AssetMissing`] if the mesh file does
    /// not exist.
    pub fn add(&mut self, kind: ShapeKind, params: SpawnParams) -> Result<EntityId> {
        let name = params.name.unwrap_or_else(|| self.unique_name(kind));

        let shape = match kind {
            ShapeKind::Cube => Shape::cube(),
            ShapeKind::Sphere => Shape::sphere(),
            ShapeKind::ImportedMesh => {
                let source = params.source.unwrap_or_else(|| self.config.default_mesh.clone());
                let path = LoadContext::default().resolve(&source);
                if !path.exists() {
                    return Err(SceneError::AssetMissing { name, path });
                }
                Shape::imported_mesh(path)
            }
        };

        let position = params
            .position
            .unwrap_or_else(|| Vec3::new(self.config.spawn_spacing * self.entities.len() as f32, 0.0, 0.0));

        let id = self.next_entity_id();
        let entity = SceneEntity::new(id, name, shape).with_position(position);
        log::info!("Created entity: {} ({})", entity.name(), kind);
        self.insert(entity);
        Ok(id)
    }

    /// Add an already built entity, replacing any entity with the same id.
    pub fn insert(&mut self, entity: SceneEntity) -> EntityId {
        let id = entity.id();
        self.next_entity_id = self.next_entity_id.max(id.0.saturating_add(1));
        if let Some(&idx) = self.entity_map.get(&id) {
            self.entities[idx] = entity;
        } else {
            self.entity_map.insert(id, self.entities.len());
            self.entities.push(entity);
        }
        id
    }

    /// Remove an entity from the scene.
    ///
    /// Commands still holding `id` find nothing to act on afterwards.
    pub fn remove(&mut self, id: EntityId) -> Option<SceneEntity> {
        let idx = self.entity_map.remove(&id)?;
        let entity = self.entities.remove(idx);

        // Update indices for entities after the removed one
        for eidx in self.entity_map.values_mut() {
            if *eidx > idx {
                *eidx -= 1;
            }
        }

        log::info!("Deleted entity: {} ({})", entity.name(), id);
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entity_map.get(&id).map(|&idx| &self.entities[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        self.entity_map.get(&id).map(|&idx| &mut self.entities[idx])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entity_map.contains_key(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities.iter().find(|e| e.name() == name).map(SceneEntity::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneEntity> {
        self.entities.iter()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(SceneEntity::id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.entity_map.clear();
    }

    /// Write every live entity to `path`, in scene order.
    pub fn save_all(&self, path: &Path) -> Result<()> {
        let records: Vec<EntityRecord> = self.entities.iter().map(SceneEntity::to_record).collect();
        SceneSerializer::save(&records, path)?;
        log::info!("Saved {} entities to {}", records.len(), path.display());
        Ok(())
    }

    /// Replace the scene with the contents of `path`.
    ///
    /// A missing or unreadable file yields an empty scene. Records that
    /// cannot be rebuilt, such as meshes whose asset is gone, are skipped.
    /// Returns the ids of the entities that were loaded.
    pub fn load_all(&mut self, path: &Path) -> Vec<EntityId> {
        self.clear();

        let values = match SceneSerializer::read(path) {
            Ok(values) => values,
            Err(SceneError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                log::info!("No scene file at {}, starting empty", path.display());
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Could not load scene from {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let ctx = LoadContext::for_scene_file(path);
        let mut loaded = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let id = self.next_entity_id();
            let entity = SceneSerializer::decode(value)
                .and_then(|record| SceneEntity::from_record(id, record, &ctx));
            match entity {
                Ok(entity) => {
                    self.insert(entity);
                    loaded.push(id);
                }
                Err(e) => log::warn!("Skipping entity record {}: {}", index, e),
            }
        }

        log::info!("Loaded {} entities from {}", loaded.len(), path.display());
        loaded
    }

    fn unique_name(&self, kind: ShapeKind) -> String {
        let mut n = self.entities.len() + 1;
        loop {
            let name = format!("{}{}", kind.name(), n);
            if self.find_by_name(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}
