//! Placing entities on the map and taking them off.

use crate::map::{EditError, EntityId, Layer, Map, MapEntity};

use super::action::{capture_z_positions, ensure_present, Action};

/// Places new entities in front of their layers
#[derive(Debug)]
pub struct AddEntities {
    ids: Vec<EntityId>,
    /// Entities currently off the map, by position in `ids`
    held: Vec<Option<MapEntity>>,
}

impl AddEntities {
    pub fn new(entities: Vec<MapEntity>) -> Self {
        Self {
            ids: entities.iter().map(MapEntity::id).collect(),
            held: entities.into_iter().map(Some).collect(),
        }
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }
}

impl Action for AddEntities {
    fn name(&self) -> &'static str {
        "Add entities"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        for slot in self.held.iter_mut() {
            if let Some(entity) = slot.as_ref() {
                map.check_new_entity(entity)?;
            }
            if let Some(entity) = slot.take() {
                map.add_entity(entity)?;
            }
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        // Entities still held were never placed.
        let placed = self
            .ids
            .iter()
            .zip(&self.held)
            .filter(|(_, slot)| slot.is_none())
            .map(|(id, _)| *id);
        ensure_present(map, placed)?;
        for (id, slot) in self.ids.iter().zip(self.held.iter_mut()).rev() {
            if slot.is_none() {
                let (entity, _) = map.remove_entity(*id)?;
                *slot = Some(entity);
            }
        }
        Ok(())
    }
}

/// Takes entities off the map. Undo puts the same instances back at their
/// former z-positions.
#[derive(Debug)]
pub struct RemoveEntities {
    positions: Vec<(EntityId, Layer, usize)>,
    held: Vec<Option<MapEntity>>,
}

impl RemoveEntities {
    pub fn new(map: &Map, entities: &[EntityId]) -> Result<Self, EditError> {
        let positions = capture_z_positions(map, entities)?;
        Ok(Self {
            held: positions.iter().map(|_| None).collect(),
            positions,
        })
    }
}

impl Action for RemoveEntities {
    fn name(&self) -> &'static str {
        "Remove entities"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        let pending = self
            .positions
            .iter()
            .zip(&self.held)
            .filter(|(_, slot)| slot.is_none())
            .map(|((id, _, _), _)| *id);
        ensure_present(map, pending)?;
        for ((id, _, _), slot) in self.positions.iter().zip(self.held.iter_mut()) {
            if slot.is_none() {
                let (entity, _) = map.remove_entity(*id)?;
                *slot = Some(entity);
            }
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        for ((id, _, _), slot) in self.positions.iter().zip(&self.held) {
            if slot.is_some() && map.contains(*id) {
                return Err(EditError::EntityAlreadyPresent(*id));
            }
        }
        let mut order: Vec<usize> = (0..self.positions.len()).collect();
        order.sort_by_key(|i| (self.positions[*i].1, self.positions[*i].2));
        for i in order {
            let (_, layer, index) = self.positions[i];
            if let Some(entity) = self.held[i].take() {
                map.insert_entity_at(entity, layer, index)?;
            }
        }
        Ok(())
    }
}
