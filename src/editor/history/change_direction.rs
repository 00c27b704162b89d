use crate::map::{Direction, EditError, EntityId, Map};

use super::action::{ensure_present, Action, Change};

/// Turns entities to a new direction
#[derive(Debug, Clone)]
pub struct ChangeDirection {
    changes: Vec<(EntityId, Change<Direction>)>,
}

impl ChangeDirection {
    /// Every entity must have a direction, and `direction` must belong to
    /// each entity's direction set.
    pub fn new(map: &Map, entities: &[EntityId], direction: Direction) -> Result<Self, EditError> {
        let mut changes = Vec::with_capacity(entities.len());
        for id in entities {
            let entity = map.get(*id)?;
            entity.check_direction(direction)?;
            if let Some(before) = entity.direction() {
                changes.push((
                    *id,
                    Change {
                        before,
                        after: direction,
                    },
                ));
            }
        }
        Ok(Self { changes })
    }
}

impl Action for ChangeDirection {
    fn name(&self) -> &'static str {
        "Change direction"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        ensure_present(map, self.changes.iter().map(|(id, _)| *id))?;
        for (id, change) in &self.changes {
            map.set_entity_direction(*id, change.after)?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        ensure_present(map, self.changes.iter().map(|(id, _)| *id))?;
        for (id, change) in self.changes.iter().rev() {
            map.set_entity_direction(*id, change.before)?;
        }
        Ok(())
    }
}
