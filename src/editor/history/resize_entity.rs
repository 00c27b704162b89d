use crate::map::{EditError, EntityId, Map};

use super::action::{ensure_present, Action, Change};

/// Gives resizable entities new sizes
#[derive(Debug, Clone)]
pub struct ResizeEntities {
    changes: Vec<(EntityId, Change<(i32, i32)>)>,
}

impl ResizeEntities {
    /// Every entity must be resizable
    pub fn new(map: &Map, sizes: &[(EntityId, i32, i32)]) -> Result<Self, EditError> {
        let mut changes = Vec::with_capacity(sizes.len());
        for (id, width, height) in sizes {
            let entity = map.get(*id)?;
            entity.require_resizable()?;
            changes.push((
                *id,
                Change {
                    before: entity.size(),
                    after: (*width, *height),
                },
            ));
        }
        Ok(Self { changes })
    }
}

impl Action for ResizeEntities {
    fn name(&self) -> &'static str {
        "Resize entities"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        for (id, change) in &self.changes {
            let (width, height) = change.after;
            map.set_entity_size(*id, width, height)?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        ensure_present(map, self.changes.iter().map(|(id, _)| *id))?;
        for (id, change) in self.changes.iter().rev() {
            let (width, height) = change.before;
            map.set_entity_size_unchecked(*id, width, height)?;
        }
        Ok(())
    }
}
