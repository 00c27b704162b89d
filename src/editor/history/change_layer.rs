use crate::map::{EditError, EntityId, Layer, Map};

use super::action::{capture_z_positions, ensure_present, Action};

/// Moves entities to another layer. Undo puts each one back at its
/// previous z-index.
#[derive(Debug, Clone)]
pub struct ChangeLayer {
    before: Vec<(EntityId, Layer, usize)>,
    layer: Layer,
}

impl ChangeLayer {
    pub fn new(map: &Map, entities: &[EntityId], layer: Layer) -> Result<Self, EditError> {
        Ok(Self {
            before: capture_z_positions(map, entities)?,
            layer,
        })
    }
}

impl Action for ChangeLayer {
    fn name(&self) -> &'static str {
        "Change layer"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        ensure_present(map, self.before.iter().map(|(id, _, _)| *id))?;
        for (id, _, _) in &self.before {
            map.set_entity_layer(*id, self.layer)?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        map.restore_z_positions(&self.before)
    }
}
