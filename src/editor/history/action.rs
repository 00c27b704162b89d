//! The reversible unit of work recorded by the history.

use std::fmt::Debug;

use crate::map::{EditError, EntityId, Layer, Map};

/// A reversible edit of a map.
///
/// An action captures the before and after values of everything it
/// touches when it is built. `execute` applies the after values and `undo`
/// the before values; applying either twice has the same effect as once.
///
/// `undo` does not re-validate: the state it restores was accepted once
/// and must stay reachable. It checks that every entity it refers to still
/// exists before changing anything, so a failed undo leaves the map as it
/// was.
///
/// Actions run with exclusive use of the map and must not submit other
/// actions to the history.
pub trait Action: Send + Sync + Debug {
    /// Short label for menus and logs, e.g. "Edit entity"
    fn name(&self) -> &'static str;

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError>;

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError>;
}

/// Before and after values of one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub before: T,
    pub after: T,
}

impl<T: Clone> Change<T> {
    /// A change that does nothing until `after` is replaced
    pub fn unchanged(value: T) -> Self {
        Self {
            before: value.clone(),
            after: value,
        }
    }
}

/// Fails with [`EditError::UnknownEntity`] on the first id missing from the map
pub(crate) fn ensure_present(
    map: &Map,
    ids: impl IntoIterator<Item = EntityId>,
) -> Result<(), EditError> {
    for id in ids {
        map.get(id)?;
    }
    Ok(())
}

/// Current layer and z-index of each entity, for
/// [`Map::restore_z_positions`]
pub(crate) fn capture_z_positions(
    map: &Map,
    ids: &[EntityId],
) -> Result<Vec<(EntityId, Layer, usize)>, EditError> {
    ids.iter()
        .map(|id| {
            map.z_position(*id)
                .map(|(layer, index)| (*id, layer, index))
                .ok_or(EditError::UnknownEntity(*id))
        })
        .collect()
}
