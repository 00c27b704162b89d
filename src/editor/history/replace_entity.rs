//! Swapping an entity for a structurally different one.

use crate::map::{EditError, EntityId, EntityKind, Map, MapEntity, StructuralError};

use super::action::Action;

/// Replaces an entity by another instance at the same layer and z-index.
///
/// The instance that is off the map is held by the action, so undo puts
/// back the very entity that was removed, not a copy rebuilt from its
/// attributes. A selected entity hands its selection over to its
/// replacement.
#[derive(Debug)]
pub struct ReplaceEntity {
    old: EntityId,
    new: EntityId,
    /// The new entity before execution, the old one after
    held: Option<MapEntity>,
}

impl ReplaceEntity {
    pub fn new(map: &Map, old: EntityId, replacement: MapEntity) -> Result<Self, EditError> {
        map.get(old)?;
        let new = replacement.id();
        if map.contains(new) {
            return Err(EditError::EntityAlreadyPresent(new));
        }
        if let Some(name) = replacement.name()
            && let Some(other) = map.entity_named(name)
            && other.id() != old
        {
            return Err(StructuralError::DuplicateName(name.to_string()).into());
        }
        Ok(Self {
            old,
            new,
            held: Some(replacement),
        })
    }

    /// Converts a static tile to a dynamic one, or the reverse
    pub fn convert_tile(map: &mut Map, tile: EntityId) -> Result<Self, EditError> {
        let new_id = map.next_entity_id();
        let entity = map.get(tile)?;
        let replacement = if entity.kind() == EntityKind::DynamicTile {
            entity.to_static_tile(new_id)?
        } else {
            entity.to_dynamic_tile(new_id)?
        };
        Self::new(map, tile, replacement)
    }

    pub fn replacement_id(&self) -> EntityId {
        self.new
    }

    /// Takes `outgoing` off the map and puts the held entity in its place
    fn swap(&mut self, map: &mut Map, outgoing: EntityId, incoming: EntityId) -> Result<(), EditError> {
        if map.contains(incoming) && !map.contains(outgoing) {
            return Ok(());
        }
        let (layer, index) = map
            .z_position(outgoing)
            .ok_or(EditError::UnknownEntity(outgoing))?;
        let held = self.held.take().ok_or(EditError::UnknownEntity(incoming))?;
        if map.contains(incoming) {
            self.held = Some(held);
            return Err(EditError::EntityAlreadyPresent(incoming));
        }

        map.transfer_selection(outgoing, incoming);
        let (removed, _) = map.remove_entity(outgoing)?;
        map.insert_entity_at(held, layer, index)?;
        self.held = Some(removed);
        Ok(())
    }
}

impl Action for ReplaceEntity {
    fn name(&self) -> &'static str {
        "Replace entity"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        let (old, new) = (self.old, self.new);
        self.swap(map, old, new)
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        let (old, new) = (self.old, self.new);
        self.swap(map, new, old)
    }
}
