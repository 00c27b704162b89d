//! Type-specific reversible sub-edits.
//!
//! The common attributes of an entity are handled by
//! [`EditEntity`](super::EditEntity); anything a kind declares on top of
//! them goes through a [`SpecificAction`] chosen from the entity kind.

use std::fmt::Debug;

use crate::map::{EditError, EntityId, EntityKind, Map, MapEntity, PropertyValue, StructuralError};

use super::action::Change;

/// Reversible edit of the state a kind adds to the common attributes.
///
/// Same contract as [`Action`](super::Action), scoped to one entity.
pub trait SpecificAction: Send + Sync + Debug {
    fn execute(&mut self, map: &mut Map, entity: EntityId) -> Result<(), EditError>;

    fn undo(&mut self, map: &mut Map, entity: EntityId) -> Result<(), EditError>;
}

/// Picks the sub-edit for an entity and the requested property values.
///
/// Kinds without specific properties get none, and reject any value.
pub fn specific_action_for(
    entity: &MapEntity,
    values: Vec<(String, PropertyValue)>,
) -> Result<Option<Box<dyn SpecificAction>>, StructuralError> {
    match entity.kind() {
        EntityKind::Sensor => match values.first() {
            None => Ok(None),
            Some((name, _)) => Err(StructuralError::UnknownProperty {
                kind: entity.kind(),
                name: name.clone(),
            }),
        },
        EntityKind::Tile
        | EntityKind::DynamicTile
        | EntityKind::Destination
        | EntityKind::Teletransporter
        | EntityKind::Destructible
        | EntityKind::Chest
        | EntityKind::ShopTreasure
        | EntityKind::Npc => Ok(Some(Box::new(EditProperties::new(entity, values)?))),
    }
}

/// Rewrites declared properties of an entity
#[derive(Debug, Clone)]
pub struct EditProperties {
    changes: Vec<(&'static str, Change<PropertyValue>)>,
}

impl EditProperties {
    /// Captures the current values of the named properties.
    ///
    /// Each name must be declared by the entity kind and each value must
    /// have the declared kind.
    pub fn new(
        entity: &MapEntity,
        values: Vec<(String, PropertyValue)>,
    ) -> Result<Self, StructuralError> {
        let declarations = entity.info().properties;
        let mut changes = Vec::with_capacity(values.len());
        for (name, after) in values {
            let Some(decl) = declarations.iter().find(|decl| decl.name == name) else {
                return Err(StructuralError::UnknownProperty {
                    kind: entity.kind(),
                    name,
                });
            };
            if decl.kind != after.kind() {
                return Err(StructuralError::PropertyKindMismatch {
                    name,
                    expected: decl.kind.as_str(),
                });
            }
            let before = entity
                .property(decl.name)
                .cloned()
                .unwrap_or_else(|| decl.default.to_value());
            changes.push((decl.name, Change { before, after }));
        }
        Ok(Self { changes })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl SpecificAction for EditProperties {
    fn execute(&mut self, map: &mut Map, entity: EntityId) -> Result<(), EditError> {
        for (name, change) in &self.changes {
            map.set_entity_property(entity, name, change.after.clone())?;
        }
        Ok(())
    }

    fn undo(&mut self, map: &mut Map, entity: EntityId) -> Result<(), EditError> {
        map.get(entity)?;
        for (name, change) in self.changes.iter().rev() {
            map.set_entity_property(entity, name, change.before.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_has_no_specific_action() {
        let sensor = MapEntity::new(EntityId(1), EntityKind::Sensor);
        assert!(specific_action_for(&sensor, vec![]).unwrap().is_none());
        assert!(matches!(
            specific_action_for(&sensor, vec![("sprite".to_string(), "x".into())]),
            Err(StructuralError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_edit_properties_rejects_undeclared_and_mistyped() {
        let chest = MapEntity::new(EntityId(1), EntityKind::Chest);
        assert!(matches!(
            EditProperties::new(&chest, vec![("price".to_string(), 3i64.into())]),
            Err(StructuralError::UnknownProperty { .. })
        ));
        assert!(matches!(
            EditProperties::new(&chest, vec![("treasure_variant".to_string(), "two".into())]),
            Err(StructuralError::PropertyKindMismatch { .. })
        ));
    }

    #[test]
    fn test_edit_properties_round_trip() {
        let mut map = Map::default();
        let chest = map.create_entity(EntityKind::Chest);
        let id = map.add_entity(chest).unwrap();

        let mut edit = EditProperties::new(
            map.get(id).unwrap(),
            vec![
                ("treasure_variant".to_string(), 3i64.into()),
                ("sprite".to_string(), "entities/big_chest".into()),
            ],
        )
        .unwrap();
        assert!(!edit.is_empty());

        edit.execute(&mut map, id).unwrap();
        let properties = map.get(id).unwrap().properties();
        assert_eq!(properties.get_integer("treasure_variant"), 3);
        assert_eq!(properties.get_str("sprite"), "entities/big_chest");

        edit.undo(&mut map, id).unwrap();
        let properties = map.get(id).unwrap().properties();
        assert_eq!(properties.get_integer("treasure_variant"), 1);
        assert_eq!(properties.get_str("sprite"), "entities/chest");
    }
}
