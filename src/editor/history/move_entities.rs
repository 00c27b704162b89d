use crate::map::{EditError, EntityId, Map, StructuralError};

use super::action::{ensure_present, Action, Change};

/// Moves entities by the same offset
#[derive(Debug, Clone)]
pub struct MoveEntities {
    moves: Vec<(EntityId, Change<(i32, i32)>)>,
}

impl MoveEntities {
    pub fn new(map: &Map, entities: &[EntityId], dx: i32, dy: i32) -> Result<Self, EditError> {
        let moves = entities
            .iter()
            .map(|id| -> Result<_, EditError> {
                let (x, y) = map.get(*id)?.position();
                let (Some(new_x), Some(new_y)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    return Err(StructuralError::OutsideMap { x, y }.into());
                };
                Ok((
                    *id,
                    Change {
                        before: (x, y),
                        after: (new_x, new_y),
                    },
                ))
            })
            .collect::<Result<Vec<_>, EditError>>()?;
        Ok(Self { moves })
    }
}

impl Action for MoveEntities {
    fn name(&self) -> &'static str {
        "Move entities"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        for (id, change) in &self.moves {
            let (x, y) = change.after;
            map.set_entity_position(*id, x, y)?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        ensure_present(map, self.moves.iter().map(|(id, _)| *id))?;
        for (id, change) in self.moves.iter().rev() {
            let (x, y) = change.before;
            map.set_entity_position_unchecked(*id, x, y)?;
        }
        Ok(())
    }
}
