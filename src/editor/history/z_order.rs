//! Reordering entities within their layer.

use crate::map::{EditError, EntityId, Layer, Map};

use super::action::{capture_z_positions, Action};

/// Brings entities in front of the others of their layer, keeping their
/// relative order
#[derive(Debug, Clone)]
pub struct BringToFront {
    before: Vec<(EntityId, Layer, usize)>,
}

impl BringToFront {
    pub fn new(map: &Map, entities: &[EntityId]) -> Result<Self, EditError> {
        Ok(Self {
            before: capture_z_positions(map, entities)?,
        })
    }
}

impl Action for BringToFront {
    fn name(&self) -> &'static str {
        "Bring to front"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        for (id, layer) in back_to_front(map, &self.before)? {
            map.move_entity_to(id, layer, usize::MAX)?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        map.restore_z_positions(&self.before)
    }
}

/// Sends entities behind the others of their layer, keeping their
/// relative order
#[derive(Debug, Clone)]
pub struct BringToBack {
    before: Vec<(EntityId, Layer, usize)>,
}

impl BringToBack {
    pub fn new(map: &Map, entities: &[EntityId]) -> Result<Self, EditError> {
        Ok(Self {
            before: capture_z_positions(map, entities)?,
        })
    }
}

impl Action for BringToBack {
    fn name(&self) -> &'static str {
        "Bring to back"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        for (id, layer) in back_to_front(map, &self.before)?.into_iter().rev() {
            map.move_entity_to(id, layer, 0)?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        map.restore_z_positions(&self.before)
    }
}

/// The entities sorted by their current z-position
fn back_to_front(
    map: &Map,
    entities: &[(EntityId, Layer, usize)],
) -> Result<Vec<(EntityId, Layer)>, EditError> {
    let ids: Vec<EntityId> = entities.iter().map(|(id, _, _)| *id).collect();
    let mut current = capture_z_positions(map, &ids)?;
    current.sort_by_key(|(_, layer, index)| (*layer, *index));
    Ok(current
        .into_iter()
        .map(|(id, layer, _)| (id, layer))
        .collect())
}
