use super::entity::EntityId;

/// Entities currently selected in the map view, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<EntityId>,
}

impl Selection {
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Returns the only selected entity, if exactly one is selected
    pub fn single(&self) -> Option<EntityId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Adds an entity; returns false if it was already selected
    pub(crate) fn select(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Removes an entity; returns false if it was not selected
    pub(crate) fn unselect(&mut self, id: EntityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| *selected != id);
        self.ids.len() != before
    }

    /// Puts `new` in the place of `old`, keeping the selection order
    pub(crate) fn replace(&mut self, old: EntityId, new: EntityId) -> bool {
        match self.ids.iter_mut().find(|id| **id == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_idempotent() {
        let mut selection = Selection::default();
        assert!(selection.select(EntityId(1)));
        assert!(!selection.select(EntityId(1)));
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.single(), Some(EntityId(1)));
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut selection = Selection::default();
        selection.select(EntityId(1));
        selection.select(EntityId(2));
        selection.select(EntityId(3));
        assert!(selection.replace(EntityId(2), EntityId(9)));
        assert_eq!(selection.ids(), &[EntityId(1), EntityId(9), EntityId(3)]);
        assert!(!selection.replace(EntityId(2), EntityId(10)));
    }

    #[test]
    fn test_unselect_and_clear() {
        let mut selection = Selection::default();
        selection.select(EntityId(1));
        selection.select(EntityId(2));
        assert!(selection.unselect(EntityId(1)));
        assert!(!selection.unselect(EntityId(1)));
        assert_eq!(selection.single(), Some(EntityId(2)));
        assert!(selection.clear());
        assert!(!selection.clear());
        assert!(selection.is_empty());
    }
}
