//! Mediator between inspector fields and the undo history.

use glam::{Quat, Vec3};
use thiserror::Error;
use void_scene::{Attribute, AttributeDelta, AttributeKey, EntityError, EntityId, SceneEntity, SceneStore};

use super::{DragGesture, EchoGate, InspectorFields};
use crate::commands::{self, CommandError, SetAttributesCommand};
use crate::core::UndoHistory;

/// Quaternions shorter than this cannot be normalized.
const MIN_ORIENTATION_LENGTH: f32 = 1e-6;

/// Quaternions this close to unit length are kept as committed.
const UNIT_LENGTH_TOLERANCE: f32 = 1e-6;

/// Errors reported to the UI when an edit cannot be made.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    #[error("No entity selected")]
    NoSelection,

    #[error("{0} no longer exists")]
    EntityGone(EntityId),

    #[error("Orientation has zero length")]
    DegenerateOrientation,

    #[error("{0} must be a finite number")]
    NonFinite(AttributeKey),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// What happened to a committed field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A command was executed and recorded.
    Applied,
    /// The value matched the entity; nothing was recorded.
    Unchanged,
    /// The commit arrived while fields were being populated and was dropped.
    Suppressed,
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Cap on recorded commands; `None` keeps every command.
    pub history_limit: Option<usize>,
    pub normalize_orientation: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_limit: None,
            normalize_orientation: true,
        }
    }
}

/// Turns field commits and viewport drags into commands, and keeps the
/// fields in sync with the selected entity after every change.
///
/// The session never owns the scene. Each operation borrows the store it
/// acts on, so the same session can follow a store that is reloaded.
pub struct EditSession<F: InspectorFields> {
    fields: F,
    gate: EchoGate,
    history: UndoHistory,
    selected: Option<EntityId>,
    drag: Option<DragGesture>,
    options: SessionOptions,
}

impl<F: InspectorFields> EditSession<F> {
    pub fn new(fields: F, options: SessionOptions) -> Self {
        Self::with_gate(fields, EchoGate::new(), options)
    }

    /// Use a gate the UI already holds a clone of.
    pub fn with_gate(fields: F, gate: EchoGate, options: SessionOptions) -> Self {
        Self {
            fields,
            gate,
            history: UndoHistory::with_limit(options.history_limit),
            selected: None,
            drag: None,
            options,
        }
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    pub fn gate(&self) -> &EchoGate {
        &self.gate
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Make `id` the edit target and show its values.
    ///
    /// Fields are written with echo suppressed. An id that is not in the
    /// scene clears the selection. A drag open on another entity is
    /// recorded first.
    pub fn load_entity(&mut self, scene: &SceneStore, id: Option<EntityId>) {
        if self.drag.as_ref().is_some_and(|g| Some(g.entity_id()) != id) {
            self.finish_drag(scene);
        }

        let entity = id.and_then(|id| scene.get(id));
        if entity.is_none() {
            if let Some(id) = id {
                log::debug!("{} not in scene, clearing selection", id);
            }
        }
        self.selected = entity.map(SceneEntity::id);

        let _guard = self.gate.suppress();
        match entity {
            Some(entity) => self.fields.populate(&entity.snapshot()),
            None => self.fields.clear(),
        }
    }

    /// Re-read the selected entity into the fields.
    pub fn refresh(&mut self, scene: &SceneStore) {
        self.load_entity(scene, self.selected);
    }

    /// Change selection, finishing any open drag first.
    pub fn select(&mut self, scene: &mut SceneStore, id: Option<EntityId>) -> Result<(), SessionError> {
        self.end_drag(scene)?;
        self.load_entity(scene, id);
        Ok(())
    }

    /// Handle a confirmed field value from the UI.
    pub fn on_field_committed(
        &mut self,
        scene: &mut SceneStore,
        attribute: Attribute,
    ) -> Result<CommitOutcome, SessionError> {
        if self.gate.is_suppressed() {
            log::trace!("Dropping {} commit during field population", attribute.key());
            return Ok(CommitOutcome::Suppressed);
        }
        let id = self.selected.ok_or(SessionError::NoSelection)?;
        if !is_finite(&attribute) {
            return Err(SessionError::NonFinite(attribute.key()));
        }
        self.end_drag(scene)?;

        let attribute = self.normalize(attribute)?;
        let entity = scene.get(id).ok_or(SessionError::EntityGone(id))?;
        if let Attribute::Dimensions(dimensions) = &attribute {
            if dimensions.kind() != entity.kind() {
                return Err(EntityError::DimensionsMismatch {
                    shape: entity.kind(),
                    given: dimensions.kind(),
                }
                .into());
            }
        }
        if entity.snapshot().attribute(attribute.key()) == attribute {
            return Ok(CommitOutcome::Unchanged);
        }

        let cmd = SetAttributesCommand::new(entity, AttributeDelta::from(attribute));
        commands::execute(scene, &mut self.history, Box::new(cmd))?;
        self.refresh(scene);
        Ok(CommitOutcome::Applied)
    }

    /// Undo the last command and resync the fields.
    ///
    /// Returns `Ok(false)` when there was nothing to undo.
    pub fn undo(&mut self, scene: &mut SceneStore) -> Result<bool, SessionError> {
        self.end_drag(scene)?;
        let undone = self.history.undo(scene);
        self.refresh(scene);
        Ok(undone?)
    }

    /// Redo the next command and resync the fields.
    pub fn redo(&mut self, scene: &mut SceneStore) -> Result<bool, SessionError> {
        self.end_drag(scene)?;
        let redone = self.history.redo(scene);
        self.refresh(scene);
        Ok(redone?)
    }

    /// Start dragging the selected entity. Returns the dragged id.
    pub fn begin_drag(&mut self, scene: &mut SceneStore) -> Result<EntityId, SessionError> {
        self.end_drag(scene)?;
        let id = self.selected.ok_or(SessionError::NoSelection)?;
        let entity = scene.get(id).ok_or(SessionError::EntityGone(id))?;
        self.drag = Some(DragGesture::begin(entity));
        Ok(id)
    }

    /// Apply one pointer-motion sample. Starts a gesture if none is open.
    ///
    /// The entity moves immediately but nothing is recorded until
    /// [`end_drag`](Self::end_drag).
    pub fn drag_by(&mut self, scene: &mut SceneStore, delta: Vec3) -> Result<(), SessionError> {
        if !delta.is_finite() {
            return Err(SessionError::NonFinite(AttributeKey::Position));
        }
        let current = self.drag.as_ref().map(DragGesture::entity_id);
        let id = match current {
            Some(id) => id,
            None => self.begin_drag(scene)?,
        };

        let Some(entity) = scene.get_mut(id) else {
            self.drag = None;
            return Err(SessionError::EntityGone(id));
        };
        let position = entity.position() + delta;
        entity.apply_partial(&Attribute::Position(position).into())?;
        self.refresh(scene);
        Ok(())
    }

    /// Finish the open gesture, recording one command if the entity moved.
    pub fn end_drag(&mut self, scene: &mut SceneStore) -> Result<bool, SessionError> {
        Ok(self.finish_drag(scene))
    }

    /// Abandon the open gesture and put the entity back where it started.
    pub fn cancel_drag(&mut self, scene: &mut SceneStore) -> Result<(), SessionError> {
        let Some(gesture) = self.drag.take() else {
            return Ok(());
        };
        if let Some(entity) = scene.get_mut(gesture.entity_id()) {
            entity.apply_partial(&Attribute::Position(gesture.start_position()).into())?;
        }
        self.refresh(scene);
        Ok(())
    }

    /// Forget `id` after the store removed it. History entries stay and
    /// become no-ops.
    pub fn entity_removed(&mut self, scene: &SceneStore, id: EntityId) {
        if self.drag.as_ref().is_some_and(|g| g.entity_id() == id) {
            self.drag = None;
        }
        if self.selected == Some(id) {
            self.load_entity(scene, None);
        }
    }

    /// Drop history, selection and any open gesture, e.g. after a reload.
    pub fn reset(&mut self, scene: &SceneStore) {
        self.drag = None;
        self.history.clear();
        self.load_entity(scene, None);
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Record the open gesture. The entity already sits at the end
    /// position, so the command is pushed without executing it again.
    fn finish_drag(&mut self, scene: &SceneStore) -> bool {
        let Some(gesture) = self.drag.take() else {
            return false;
        };
        let Some(end) = scene.get(gesture.entity_id()).map(SceneEntity::position) else {
            return false;
        };
        match gesture.into_command(end) {
            Some(cmd) => {
                self.history.push(Box::new(cmd));
                true
            }
            None => false,
        }
    }

    fn normalize(&self, attribute: Attribute) -> Result<Attribute, SessionError> {
        match attribute {
            Attribute::Orientation(q) if self.options.normalize_orientation => {
                normalize_orientation(q).map(Attribute::Orientation)
            }
            other => Ok(other),
        }
    }
}

fn is_finite(attribute: &Attribute) -> bool {
    match attribute {
        Attribute::Position(p) => p.is_finite(),
        Attribute::Orientation(q) => q.is_finite(),
        Attribute::Dimensions(d) => d.to_vec().iter().all(|v| v.is_finite()),
        Attribute::Name(_) | Attribute::Color(_) => true,
    }
}

fn normalize_orientation(q: Quat) -> Result<Quat, SessionError> {
    let length = q.length();
    if !length.is_finite() || length < MIN_ORIENTATION_LENGTH {
        return Err(SessionError::DegenerateOrientation);
    }
    if (length - 1.0).abs() <= UNIT_LENGTH_TOLERANCE {
        return Ok(q);
    }
    Ok(q.normalize())
}
