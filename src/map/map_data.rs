use std::collections::HashMap;

use bevy::log::debug;
use bevy::prelude::Resource;

use crate::constants::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, SIZE_STEP};
use crate::editor::history::{Action, CommandHistory};

use super::entity::{Direction, EntityId, MapEntity, Subtype};
use super::error::{EditError, StructuralError};
use super::kinds::EntityKind;
use super::layer::Layer;
use super::notify::{ListenerId, MapChange, MapListener, Notifier};
use super::property::PropertyValue;
use super::resources::QuestResources;
use super::selection::Selection;

/// A map being edited.
///
/// The map owns its entities, their z-order within each layer, the
/// selection and the undo/redo history. It is the only way to mutate an
/// entity once placed: every setter records a [`MapChange`], delivered to
/// listeners right away, or once the running action completes.
#[derive(Resource, Debug)]
pub struct Map {
    pub name: String,
    width: i32,
    height: i32,
    entities: HashMap<EntityId, MapEntity>,
    /// Entity ids per layer, back to front
    layers: Vec<Vec<EntityId>>,
    selection: Selection,
    resources: QuestResources,
    history: CommandHistory,
    next_id: u64,
    action_in_flight: bool,
    notifier: Notifier,
}

impl Default for Map {
    fn default() -> Self {
        Self::new(
            "Untitled map",
            DEFAULT_MAP_WIDTH,
            DEFAULT_MAP_HEIGHT,
            QuestResources::default(),
        )
    }
}

impl Map {
    pub fn new(name: impl Into<String>, width: i32, height: i32, resources: QuestResources) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            entities: HashMap::new(),
            layers: Layer::all().iter().map(|_| Vec::new()).collect(),
            selection: Selection::default(),
            resources,
            history: CommandHistory::default(),
            next_id: 1,
            action_in_flight: false,
            notifier: Notifier::default(),
        }
    }

    /// Bounds the number of undoable actions
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = CommandHistory::with_limit(limit);
        self
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn resources(&self) -> &QuestResources {
        &self.resources
    }

    /// Swaps the resource catalog and re-resolves every entity's derived state
    pub fn set_resources(&mut self, resources: QuestResources) {
        self.resources = resources;
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.refresh_entity(id);
        }
    }

    /// Reserves a fresh entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Creates an entity of `kind` with a fresh id. Not yet on the map.
    pub fn create_entity(&mut self, kind: EntityKind) -> MapEntity {
        let id = self.next_entity_id();
        MapEntity::new(id, kind)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&MapEntity> {
        self.entities.get(&id)
    }

    pub fn get(&self, id: EntityId) -> Result<&MapEntity, EditError> {
        self.entities.get(&id).ok_or(EditError::UnknownEntity(id))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_named(&self, name: &str) -> Option<&MapEntity> {
        self.entities.values().find(|e| e.name() == Some(name))
    }

    /// Ids of the entities of a layer, back to front
    pub fn layer_entities(&self, layer: Layer) -> &[EntityId] {
        &self.layers[layer.id()]
    }

    /// All entities, lowest layer first and back to front within a layer
    pub fn entities(&self) -> impl Iterator<Item = &MapEntity> {
        self.layers
            .iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
    }

    /// Layer and index within that layer's z-order
    pub fn z_position(&self, id: EntityId) -> Option<(Layer, usize)> {
        let layer = self.entities.get(&id)?.layer();
        let index = self.layers[layer.id()].iter().position(|e| *e == id)?;
        Some((layer, index))
    }

    /// Checks that [`Map::add_entity`] would accept an entity
    pub fn check_new_entity(&self, entity: &MapEntity) -> Result<(), EditError> {
        let id = entity.id();
        if self.contains(id) {
            return Err(EditError::EntityAlreadyPresent(id));
        }
        if let Some(name) = entity.name() {
            self.check_unique_name(id, name)?;
        }
        if entity.is_resizable() {
            let (width, height) = entity.size();
            check_size(width, height)?;
        }
        let (x, y) = entity.position();
        self.check_position(entity, x, y)?;
        Ok(())
    }

    /// Places a new entity in front of its layer
    pub fn add_entity(&mut self, mut entity: MapEntity) -> Result<EntityId, EditError> {
        self.check_new_entity(&entity)?;
        let id = entity.id();
        entity.refresh_derived(&self.resources);
        let layer = entity.layer();
        self.insert_unchecked(entity, layer, usize::MAX);
        self.settle();
        debug!("Added entity {} to map '{}'", id, self.name);
        Ok(id)
    }

    /// Puts an entity back at an exact z-position, without structural checks.
    ///
    /// `index` is clamped to the layer length.
    pub fn insert_entity_at(
        &mut self,
        mut entity: MapEntity,
        layer: Layer,
        index: usize,
    ) -> Result<(), EditError> {
        let id = entity.id();
        if self.contains(id) {
            return Err(EditError::EntityAlreadyPresent(id));
        }
        entity.set_layer(layer);
        entity.refresh_derived(&self.resources);
        self.insert_unchecked(entity, layer, index);
        self.settle();
        Ok(())
    }

    fn insert_unchecked(&mut self, entity: MapEntity, layer: Layer, index: usize) {
        let id = entity.id();
        self.next_id = self.next_id.max(id.0 + 1);
        let order = &mut self.layers[layer.id()];
        order.insert(index.min(order.len()), id);
        self.entities.insert(id, entity);
        self.record(MapChange::EntityAdded(id));
        self.record(MapChange::LayerOrderChanged(layer));
    }

    /// Takes an entity off the map, returning it with its former z-index.
    /// The entity also leaves the selection.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<(MapEntity, usize), EditError> {
        let (layer, index) = self.z_position(id).ok_or(EditError::UnknownEntity(id))?;
        self.layers[layer.id()].remove(index);
        let entity = self
            .entities
            .remove(&id)
            .ok_or(EditError::UnknownEntity(id))?;
        if self.selection.unselect(id) {
            self.record(MapChange::SelectionChanged);
        }
        self.record(MapChange::EntityRemoved(id));
        self.record(MapChange::LayerOrderChanged(layer));
        self.settle();
        debug!("Removed entity {} from map '{}'", id, self.name);
        Ok((entity, index))
    }

    pub fn set_entity_name(&mut self, id: EntityId, name: Option<String>) -> Result<(), EditError> {
        self.get(id)?.require_name()?;
        if let Some(name) = &name {
            self.check_unique_name(id, name)?;
        }
        self.entity_mut(id)?.set_name(name);
        self.record(MapChange::EntityChanged(id));
        self.settle();
        Ok(())
    }

    /// Moves an entity to another layer, in front of the entities there.
    /// Does nothing if the entity is already on that layer.
    pub fn set_entity_layer(&mut self, id: EntityId, layer: Layer) -> Result<(), EditError> {
        let current = self.get(id)?.layer();
        if current == layer {
            return Ok(());
        }
        self.move_entity_to(id, layer, usize::MAX)
    }

    /// Places an entity at an exact z-position. `index` is clamped.
    pub fn move_entity_to(&mut self, id: EntityId, layer: Layer, index: usize) -> Result<(), EditError> {
        let (old_layer, old_index) = self.z_position(id).ok_or(EditError::UnknownEntity(id))?;
        self.layers[old_layer.id()].remove(old_index);
        let order = &mut self.layers[layer.id()];
        order.insert(index.min(order.len()), id);
        self.entity_mut(id)?.set_layer(layer);
        self.record(MapChange::EntityChanged(id));
        self.record(MapChange::LayerOrderChanged(old_layer));
        self.record(MapChange::LayerOrderChanged(layer));
        self.settle();
        Ok(())
    }

    /// Restores a set of z-positions captured with [`Map::z_position`].
    ///
    /// All the entities are lifted first, then put back by ascending
    /// index, which rebuilds the captured order exactly when the other
    /// entities of the layers did not move in between.
    pub fn restore_z_positions(&mut self, positions: &[(EntityId, Layer, usize)]) -> Result<(), EditError> {
        for (id, _, _) in positions {
            self.get(*id)?;
        }
        for (id, _, _) in positions {
            if let Some((layer, index)) = self.z_position(*id) {
                self.layers[layer.id()].remove(index);
                self.record(MapChange::LayerOrderChanged(layer));
            }
        }
        let mut sorted = positions.to_vec();
        sorted.sort_by_key(|(_, layer, index)| (*layer, *index));
        for (id, layer, index) in sorted {
            let order = &mut self.layers[layer.id()];
            order.insert(index.min(order.len()), id);
            self.entity_mut(id)?.set_layer(layer);
            self.record(MapChange::EntityChanged(id));
            self.record(MapChange::LayerOrderChanged(layer));
        }
        self.settle();
        Ok(())
    }

    /// Moves an entity, refusing positions that leave the map entirely
    pub fn set_entity_position(&mut self, id: EntityId, x: i32, y: i32) -> Result<(), EditError> {
        let entity = self.get(id)?;
        self.check_position(entity, x, y)?;
        self.set_entity_position_unchecked(id, x, y)
    }

    /// Moves an entity anywhere, even outside the map
    pub fn set_entity_position_unchecked(&mut self, id: EntityId, x: i32, y: i32) -> Result<(), EditError> {
        self.entity_mut(id)?.set_position(x, y);
        self.record(MapChange::EntityChanged(id));
        self.settle();
        Ok(())
    }

    /// Resizes a resizable entity to a valid size
    pub fn set_entity_size(&mut self, id: EntityId, width: i32, height: i32) -> Result<(), EditError> {
        self.get(id)?.require_resizable()?;
        check_size(width, height)?;
        self.set_entity_size_unchecked(id, width, height)
    }

    /// Resizes a resizable entity to any size, including empty or negative ones
    pub fn set_entity_size_unchecked(&mut self, id: EntityId, width: i32, height: i32) -> Result<(), EditError> {
        let entity = self.entity_mut(id)?;
        entity.require_resizable()?;
        entity.set_size(width, height);
        self.record(MapChange::EntityChanged(id));
        self.settle();
        Ok(())
    }

    pub fn set_entity_direction(&mut self, id: EntityId, direction: Direction) -> Result<(), EditError> {
        let entity = self.entity_mut(id)?;
        entity.check_direction(direction)?;
        entity.set_direction(direction);
        self.record(MapChange::EntityChanged(id));
        self.settle();
        Ok(())
    }

    pub fn set_entity_subtype(&mut self, id: EntityId, subtype: Subtype) -> Result<(), EditError> {
        let entity = self.entity_mut(id)?;
        entity.check_subtype(subtype)?;
        entity.set_subtype(subtype);
        self.record(MapChange::EntityChanged(id));
        self.settle();
        Ok(())
    }

    /// Writes a property and refreshes the derived state, even when the
    /// new value does not validate. Returns the previous value.
    pub fn set_entity_property(
        &mut self,
        id: EntityId,
        name: &str,
        value: PropertyValue,
    ) -> Result<PropertyValue, EditError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(EditError::UnknownEntity(id))?;
        let previous = entity.replace_property(name, value.clone())?;
        entity.notify_property_changed(name, &value, &self.resources);
        self.record(MapChange::EntityChanged(id));
        self.settle();
        Ok(previous)
    }

    /// Runs the property checks of an entity
    pub fn check_entity(&self, id: EntityId) -> Result<(), EditError> {
        self.get(id)?.check_properties(&self.resources)?;
        Ok(())
    }

    /// Recomputes the derived state of an entity. Unknown ids are ignored.
    pub fn refresh_entity(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.refresh_derived(&self.resources);
            self.record(MapChange::EntityChanged(id));
            self.settle();
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select(&mut self, id: EntityId) -> Result<(), EditError> {
        self.get(id)?;
        if self.selection.select(id) {
            self.record(MapChange::SelectionChanged);
            self.settle();
        }
        Ok(())
    }

    pub fn unselect(&mut self, id: EntityId) {
        if self.selection.unselect(id) {
            self.record(MapChange::SelectionChanged);
            self.settle();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.record(MapChange::SelectionChanged);
            self.settle();
        }
    }

    /// Moves the selection of `old` to `new`
    pub(crate) fn transfer_selection(&mut self, old: EntityId, new: EntityId) {
        if self.selection.replace(old, new) {
            self.record(MapChange::SelectionChanged);
            self.settle();
        }
    }

    fn selected_entities(&self) -> impl Iterator<Item = &MapEntity> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    /// The layer shared by all selected entities
    pub fn selection_layer(&self) -> Option<Layer> {
        common(self.selected_entities().map(MapEntity::layer))
    }

    /// The direction shared by all selected entities
    pub fn selection_direction(&self) -> Option<Direction> {
        common(self.selected_entities().map(MapEntity::direction)).flatten()
    }

    /// Number of directions offered for the selection: 0 when some selected
    /// entity has no direction or the counts differ
    pub fn selection_direction_count(&self) -> u8 {
        common(
            self.selected_entities()
                .map(|e| e.info().directions.map(|set| set.count)),
        )
        .flatten()
        .unwrap_or(0)
    }

    /// Whether every selected entity is resizable
    pub fn selection_is_resizable(&self) -> bool {
        !self.selection.is_empty() && self.selected_entities().all(MapEntity::is_resizable)
    }

    pub fn subscribe(&mut self, listener: MapListener) -> ListenerId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Applies an action and records it in the history.
    ///
    /// On failure the action's effects are rolled back and the history is
    /// left as it was.
    pub fn do_action(&mut self, action: impl Action + 'static) -> Result<(), EditError> {
        self.run_history(|history, map| history.do_action(Box::new(action), map))
    }

    pub fn undo(&mut self) -> Result<(), EditError> {
        self.run_history(|history, map| history.undo(map))
    }

    pub fn redo(&mut self) -> Result<(), EditError> {
        self.run_history(|history, map| history.redo(map))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Remembers the current state as the saved one
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Whether the map is in its last saved state
    pub fn is_saved(&self) -> bool {
        self.history.is_saved()
    }

    /// Drops every recorded action
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.record(MapChange::HistoryChanged);
        self.settle();
    }

    /// Gives the history exclusive use of the map for one operation.
    ///
    /// While it runs, notifications are held back and nested history
    /// operations fail with [`EditError::Reentrant`].
    fn run_history<F>(&mut self, operation: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut CommandHistory, &mut Map) -> Result<(), EditError>,
    {
        if self.action_in_flight {
            return Err(EditError::Reentrant);
        }
        self.action_in_flight = true;
        let mut history = std::mem::take(&mut self.history);
        let result = operation(&mut history, self);
        self.history = history;
        self.action_in_flight = false;

        match result {
            Ok(()) => {
                self.notifier.record(MapChange::HistoryChanged);
                self.notifier.flush();
            }
            Err(_) => self.notifier.discard(),
        }
        result
    }

    fn record(&mut self, change: MapChange) {
        self.notifier.record(change);
    }

    /// Delivers recorded changes unless an action is still running
    fn settle(&mut self) {
        if !self.action_in_flight {
            self.notifier.flush();
        }
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut MapEntity, EditError> {
        self.entities
            .get_mut(&id)
            .ok_or(EditError::UnknownEntity(id))
    }

    fn check_unique_name(&self, id: EntityId, name: &str) -> Result<(), StructuralError> {
        match self.entity_named(name) {
            Some(other) if other.id() != id => Err(StructuralError::DuplicateName(name.to_string())),
            _ => Ok(()),
        }
    }

    /// The entity's bounding box must overlap the map
    fn check_position(&self, entity: &MapEntity, x: i32, y: i32) -> Result<(), StructuralError> {
        let (width, height) = entity.size();
        let (x64, y64) = (i64::from(x), i64::from(y));
        let overlaps = x64 + i64::from(width) > 0
            && y64 + i64::from(height) > 0
            && x < self.width
            && y < self.height;
        if overlaps {
            Ok(())
        } else {
            Err(StructuralError::OutsideMap { x, y })
        }
    }
}

/// Sizes are positive multiples of the grid step
pub fn check_size(width: i32, height: i32) -> Result<(), StructuralError> {
    let valid = width > 0 && height > 0 && width % SIZE_STEP == 0 && height % SIZE_STEP == 0;
    if valid {
        Ok(())
    } else {
        Err(StructuralError::InvalidSize {
            width,
            height,
            step: SIZE_STEP,
        })
    }
}

/// The value shared by every item, `None` when they differ or there are none
fn common<T: PartialEq>(mut values: impl Iterator<Item = T>) -> Option<T> {
    let first = values.next()?;
    for value in values {
        if value != first {
            return None;
        }
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn sensor(map: &mut Map, x: i32, y: i32) -> EntityId {
        let entity = map.create_entity(EntityKind::Sensor).with_position(x, y);
        map.add_entity(entity).unwrap()
    }

    #[test]
    fn test_default_map() {
        let map = Map::default();
        assert_eq!(map.name, "Untitled map");
        assert_eq!(map.size(), (DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT));
        assert_eq!(map.entity_count(), 0);
        assert!(!map.can_undo());
    }

    #[test]
    fn test_add_entity_goes_in_front_of_its_layer() {
        let mut map = Map::default();
        let a = sensor(&mut map, 0, 0);
        let b = sensor(&mut map, 16, 0);
        assert_eq!(map.layer_entities(Layer::Low), &[a, b]);
        assert_eq!(map.z_position(b), Some((Layer::Low, 1)));
    }

    #[test]
    fn test_add_entity_rejects_duplicates() {
        let mut map = Map::default();
        let entity = map
            .create_entity(EntityKind::Sensor)
            .with_name("trap")
            .unwrap();
        let copy = entity.clone();
        map.add_entity(entity).unwrap();
        assert_eq!(
            map.add_entity(copy.clone()),
            Err(EditError::EntityAlreadyPresent(copy.id()))
        );

        let other = map
            .create_entity(EntityKind::Sensor)
            .with_name("trap")
            .unwrap();
        assert_eq!(
            map.add_entity(other),
            Err(EditError::Structural(StructuralError::DuplicateName("trap".to_string())))
        );
    }

    #[test]
    fn test_add_entity_bumps_next_id() {
        let mut map = Map::default();
        map.add_entity(MapEntity::new(EntityId(40), EntityKind::Sensor))
            .unwrap();
        assert_eq!(map.next_entity_id(), EntityId(41));
    }

    #[test]
    fn test_checked_size_and_unchecked_size() {
        let mut map = Map::default();
        let id = sensor(&mut map, 0, 0);
        assert!(matches!(
            map.set_entity_size(id, 0, 16),
            Err(EditError::Structural(StructuralError::InvalidSize { .. }))
        ));
        assert_eq!(map.get(id).unwrap().size(), (16, 16));

        map.set_entity_size_unchecked(id, 0, -8).unwrap();
        assert_eq!(map.get(id).unwrap().size(), (0, -8));
    }

    #[test]
    fn test_unchecked_size_still_needs_a_resizable_kind() {
        let mut map = Map::default();
        let pot = map.create_entity(EntityKind::Destructible);
        let id = map.add_entity(pot).unwrap();
        assert_eq!(
            map.set_entity_size_unchecked(id, 32, 32),
            Err(EditError::Structural(StructuralError::NotResizable {
                kind: EntityKind::Destructible
            }))
        );
    }

    #[test]
    fn test_checked_position_stays_on_the_map() {
        let mut map = Map::default();
        let id = sensor(&mut map, 0, 0);
        assert!(map.set_entity_position(id, -16, 0).is_err());
        assert!(map.set_entity_position(id, -8, 0).is_ok());
        map.set_entity_position_unchecked(id, -100, -100).unwrap();
        assert_eq!(map.get(id).unwrap().position(), (-100, -100));
    }

    #[test]
    fn test_position_check_near_integer_limits() {
        let mut map = Map::default();
        let id = sensor(&mut map, 0, 0);
        assert_eq!(
            map.set_entity_position(id, i32::MAX - 4, 0),
            Err(EditError::Structural(StructuralError::OutsideMap {
                x: i32::MAX - 4,
                y: 0
            }))
        );
        assert!(map.set_entity_position(id, 0, i32::MIN).is_err());
        assert_eq!(map.get(id).unwrap().position(), (0, 0));
    }

    #[test]
    fn test_set_layer_moves_to_front_of_target_layer() {
        let mut map = Map::default();
        let a = sensor(&mut map, 0, 0);
        let b = sensor(&mut map, 0, 0);
        let high = map
            .create_entity(EntityKind::Sensor)
            .with_layer(Layer::High);
        let c = map.add_entity(high).unwrap();

        map.set_entity_layer(a, Layer::High).unwrap();
        assert_eq!(map.layer_entities(Layer::Low), &[b]);
        assert_eq!(map.layer_entities(Layer::High), &[c, a]);
        assert_eq!(map.get(a).unwrap().layer(), Layer::High);
    }

    #[test]
    fn test_restore_z_positions() {
        let mut map = Map::default();
        let ids: Vec<_> = (0..4).map(|i| sensor(&mut map, i * 16, 0)).collect();
        let saved: Vec<_> = [ids[0], ids[2]]
            .iter()
            .map(|id| {
                let (layer, index) = map.z_position(*id).unwrap();
                (*id, layer, index)
            })
            .collect();

        map.set_entity_layer(ids[0], Layer::High).unwrap();
        map.move_entity_to(ids[2], Layer::Low, usize::MAX).unwrap();
        assert_eq!(map.layer_entities(Layer::Low), &[ids[1], ids[3], ids[2]]);

        map.restore_z_positions(&saved).unwrap();
        assert_eq!(map.layer_entities(Layer::Low), ids.as_slice());
        assert!(map.layer_entities(Layer::High).is_empty());
    }

    #[test]
    fn test_remove_entity_leaves_selection() {
        let mut map = Map::default();
        let id = sensor(&mut map, 0, 0);
        map.select(id).unwrap();
        let (entity, index) = map.remove_entity(id).unwrap();
        assert_eq!(entity.id(), id);
        assert_eq!(index, 0);
        assert!(map.selection().is_empty());
        assert!(!map.contains(id));
    }

    #[test]
    fn test_property_write_updates_sprite_even_when_invalid() {
        let mut resources = QuestResources::default();
        resources.sprites.insert("entities/pot".to_string());
        let mut map = Map::new("test", 320, 240, resources);
        let pot = map.create_entity(EntityKind::Destructible);
        let id = map.add_entity(pot).unwrap();

        map.set_entity_property(id, "sprite", "entities/pot".into())
            .unwrap();
        assert!(map.get(id).unwrap().sprite().is_some());
        assert!(map.check_entity(id).is_ok());

        map.set_entity_property(id, "sprite", "entities/vase".into())
            .unwrap();
        assert!(map.get(id).unwrap().sprite().is_none());
        assert!(matches!(map.check_entity(id), Err(EditError::Validation(_))));
    }

    #[test]
    fn test_selection_queries() {
        let mut map = Map::default();
        let a = map.create_entity(EntityKind::Npc);
        let b = map
            .create_entity(EntityKind::Npc)
            .with_direction(Direction::Facing(2))
            .unwrap();
        let a = map.add_entity(a).unwrap();
        let b = map.add_entity(b).unwrap();
        let s = sensor(&mut map, 0, 0);

        map.select(a).unwrap();
        map.select(b).unwrap();
        assert_eq!(map.selection_layer(), Some(Layer::Low));
        assert_eq!(map.selection_direction(), None);
        assert_eq!(map.selection_direction_count(), 4);
        assert!(!map.selection_is_resizable());

        map.set_entity_direction(a, Direction::Facing(2)).unwrap();
        assert_eq!(map.selection_direction(), Some(Direction::Facing(2)));

        map.select(s).unwrap();
        assert_eq!(map.selection_direction_count(), 0);
    }

    #[test]
    fn test_direct_setters_notify_immediately() {
        let mut map = Map::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        map.subscribe(Box::new(move |changes| {
            sink.lock().unwrap().extend_from_slice(changes);
        }));

        let id = sensor(&mut map, 0, 0);
        map.set_entity_position(id, 8, 8).unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&MapChange::EntityAdded(id)));
        assert!(seen.contains(&MapChange::EntityChanged(id)));
    }

    #[test]
    fn test_unsubscribe() {
        let mut map = Map::default();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let listener = map.subscribe(Box::new(move |_| *counter.lock().unwrap() += 1));
        sensor(&mut map, 0, 0);
        assert!(map.unsubscribe(listener));
        sensor(&mut map, 0, 0);
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
