//! Placeable map entities.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{StructuralError, ValidationError};
use super::kinds::{DirectionSet, EntityKind, KindInfo};
use super::layer::Layer;
use super::property::{PropertyBundle, PropertyValue};
use super::resources::QuestResources;
use super::validation;

/// Stable identity of an entity within a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Facing of a directional entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The kind's "no direction" choice
    NoDirection,
    /// Index into the kind's direction set (0 is east, counter-clockwise)
    Facing(u8),
}

impl Direction {
    /// Whether `set` contains this direction
    pub fn is_in(&self, set: &DirectionSet) -> bool {
        match self {
            Direction::NoDirection => set.none_label.is_some(),
            Direction::Facing(index) => *index < set.count,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::NoDirection => f.write_str("none"),
            Direction::Facing(index) => write!(f, "{index}"),
        }
    }
}

/// Index into the kind's subtype list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subtype(pub u8);

/// Sprite resolved from an entity's "sprite" property. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub id: String,
}

/// An entity placed on a map.
///
/// Attributes the kind does not support are `None` and stay that way.
/// Once on a map, an entity only changes through the map's setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntity {
    id: EntityId,
    kind: EntityKind,
    name: Option<String>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    layer: Layer,
    direction: Option<Direction>,
    subtype: Option<Subtype>,
    properties: PropertyBundle,
    sprite: Option<SpriteRef>,
}

impl MapEntity {
    /// Creates an entity of `kind` with the kind's defaults at (0, 0)
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        let info = kind.info();
        Self {
            id,
            kind,
            name: None,
            x: 0,
            y: 0,
            width: info.default_size.0,
            height: info.default_size.1,
            layer: Layer::default(),
            direction: info.directions.map(|_| Direction::Facing(0)),
            subtype: (!info.subtypes.is_empty()).then_some(Subtype(0)),
            properties: PropertyBundle::from_decls(info.properties),
            sprite: None,
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Result<Self, StructuralError> {
        self.require_resizable()?;
        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, StructuralError> {
        self.require_name()?;
        self.name = Some(name.into());
        Ok(self)
    }

    pub fn with_direction(mut self, direction: Direction) -> Result<Self, StructuralError> {
        self.check_direction(direction)?;
        self.direction = Some(direction);
        Ok(self)
    }

    pub fn with_subtype(mut self, subtype: Subtype) -> Result<Self, StructuralError> {
        self.check_subtype(subtype)?;
        self.subtype = Some(subtype);
        Ok(self)
    }

    pub fn with_property(
        mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Self, StructuralError> {
        self.replace_property(name, value.into())?;
        Ok(self)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn info(&self) -> &'static KindInfo {
        self.kind.info()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn subtype(&self) -> Option<Subtype> {
        self.subtype
    }

    pub fn subtype_name(&self) -> Option<&'static str> {
        let subtype = self.subtype?;
        self.info().subtypes.get(subtype.0 as usize).copied()
    }

    pub fn properties(&self) -> &PropertyBundle {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Sprite currently resolved from the "sprite" property, if any
    pub fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    pub fn can_have_name(&self) -> bool {
        self.kind.can_have_name()
    }

    pub fn is_resizable(&self) -> bool {
        self.kind.is_resizable()
    }

    pub fn has_direction_property(&self) -> bool {
        self.kind.has_direction_property()
    }

    pub fn has_subtype(&self) -> bool {
        self.kind.has_subtype()
    }

    /// Checks the property bundle against the rules of the entity kind.
    ///
    /// Never modifies the entity.
    pub fn check_properties(&self, resources: &QuestResources) -> Result<(), ValidationError> {
        for decl in self.info().properties {
            if decl.required
                && let Some(PropertyValue::String(value)) = self.properties.get(decl.name)
                && value.is_empty()
            {
                return Err(ValidationError::for_property(
                    decl.name,
                    format!("Property '{}' is required", decl.name),
                ));
            }
        }
        validation::check_kind_rules(self, resources)
    }

    /// Recomputes derived state after a property write.
    ///
    /// Invalid values are accepted: an unresolvable sprite name clears the
    /// sprite so the editor shows the broken state.
    pub fn notify_property_changed(
        &mut self,
        name: &str,
        value: &PropertyValue,
        resources: &QuestResources,
    ) {
        if name == "sprite" {
            self.sprite = value
                .as_str()
                .filter(|id| resources.has_sprite(id))
                .map(|id| SpriteRef { id: id.to_string() });
        }
    }

    /// Recomputes all derived state from the current properties
    pub fn refresh_derived(&mut self, resources: &QuestResources) {
        match self.properties.get("sprite").cloned() {
            Some(value) => self.notify_property_changed("sprite", &value, resources),
            None => self.sprite = None,
        }
    }

    /// Builds the dynamic tile equivalent of a static tile
    pub fn to_dynamic_tile(&self, new_id: EntityId) -> Result<MapEntity, StructuralError> {
        if self.kind != EntityKind::Tile {
            return Err(StructuralError::NotConvertible { kind: self.kind });
        }
        self.convert_tile(new_id, EntityKind::DynamicTile)
    }

    /// Builds the static tile equivalent of a dynamic tile. The name is dropped.
    pub fn to_static_tile(&self, new_id: EntityId) -> Result<MapEntity, StructuralError> {
        if self.kind != EntityKind::DynamicTile {
            return Err(StructuralError::NotConvertible { kind: self.kind });
        }
        self.convert_tile(new_id, EntityKind::Tile)
    }

    fn convert_tile(&self, new_id: EntityId, kind: EntityKind) -> Result<MapEntity, StructuralError> {
        let mut tile = MapEntity::new(new_id, kind)
            .with_position(self.x, self.y)
            .with_layer(self.layer)
            .with_size(self.width, self.height)?;
        tile.replace_property("pattern", PropertyValue::String(self.properties.get_str("pattern").to_string()))?;
        Ok(tile)
    }

    pub(crate) fn require_name(&self) -> Result<(), StructuralError> {
        if self.can_have_name() {
            Ok(())
        } else {
            Err(StructuralError::NoName { kind: self.kind })
        }
    }

    pub(crate) fn require_resizable(&self) -> Result<(), StructuralError> {
        if self.is_resizable() {
            Ok(())
        } else {
            Err(StructuralError::NotResizable { kind: self.kind })
        }
    }

    pub(crate) fn check_direction(&self, direction: Direction) -> Result<(), StructuralError> {
        let Some(set) = self.info().directions else {
            return Err(StructuralError::NoDirection { kind: self.kind });
        };
        if direction.is_in(&set) {
            Ok(())
        } else {
            Err(StructuralError::InvalidDirection {
                kind: self.kind,
                direction: direction.to_string(),
            })
        }
    }

    pub(crate) fn check_subtype(&self, subtype: Subtype) -> Result<(), StructuralError> {
        let subtypes = self.info().subtypes;
        if subtypes.is_empty() {
            return Err(StructuralError::NoSubtype { kind: self.kind });
        }
        if (subtype.0 as usize) < subtypes.len() {
            Ok(())
        } else {
            Err(StructuralError::InvalidSubtype {
                kind: self.kind,
                subtype: subtype.0,
            })
        }
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub(crate) fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub(crate) fn set_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub(crate) fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    pub(crate) fn set_subtype(&mut self, subtype: Subtype) {
        self.subtype = Some(subtype);
    }

    /// Writes a declared property without touching derived state
    pub(crate) fn replace_property(
        &mut self,
        name: &str,
        value: PropertyValue,
    ) -> Result<PropertyValue, StructuralError> {
        if !self.properties.contains(name) {
            return Err(StructuralError::UnknownProperty {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        self.properties.set(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources() -> QuestResources {
        let mut resources = QuestResources::default();
        resources.sprites.insert("entities/pot".to_string());
        resources.items.insert("rupee".to_string());
        resources.dialogs.insert("shop.rupee".to_string());
        resources.tile_patterns.insert("grass".to_string());
        resources
    }

    #[test]
    fn test_new_entity_only_has_supported_attributes() {
        let chest = MapEntity::new(EntityId(1), EntityKind::Chest);
        assert_eq!(chest.direction(), None);
        assert_eq!(chest.subtype(), None);
        assert_eq!(chest.size(), (16, 16));

        let npc = MapEntity::new(EntityId(2), EntityKind::Npc);
        assert_eq!(npc.direction(), Some(Direction::Facing(0)));
        assert_eq!(npc.subtype(), Some(Subtype(0)));
        assert_eq!(npc.subtype_name(), Some("generalized_npc"));
    }

    #[test]
    fn test_builders_respect_capabilities() {
        let tile = MapEntity::new(EntityId(1), EntityKind::Tile);
        assert_eq!(
            tile.clone().with_name("door").unwrap_err(),
            StructuralError::NoName { kind: EntityKind::Tile }
        );
        let pot = MapEntity::new(EntityId(2), EntityKind::Destructible);
        assert_eq!(
            pot.with_size(32, 32).unwrap_err(),
            StructuralError::NotResizable { kind: EntityKind::Destructible }
        );
        assert!(tile.with_size(32, 8).is_ok());
    }

    #[test]
    fn test_direction_must_belong_to_the_kind_set() {
        let npc = MapEntity::new(EntityId(1), EntityKind::Npc);
        assert!(npc.clone().with_direction(Direction::Facing(3)).is_ok());
        assert!(npc.clone().with_direction(Direction::NoDirection).is_ok());
        assert!(matches!(
            npc.with_direction(Direction::Facing(4)),
            Err(StructuralError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn test_shop_treasure_requires_treasure_name() {
        let resources = resources();
        let mut shop = MapEntity::new(EntityId(1), EntityKind::ShopTreasure)
            .with_property("price", 20i64)
            .unwrap()
            .with_property("dialog", "shop.rupee")
            .unwrap();

        let err = shop.check_properties(&resources).unwrap_err();
        assert_eq!(err.property.as_deref(), Some("treasure_name"));
        assert!(err.reason.contains("treasure_name"));

        shop.replace_property("treasure_name", "rupee".into()).unwrap();
        assert_eq!(shop.check_properties(&resources), Ok(()));
    }

    #[test]
    fn test_check_properties_does_not_mutate() {
        let resources = resources();
        let pot = MapEntity::new(EntityId(1), EntityKind::Destructible)
            .with_property("sprite", "entities/missing")
            .unwrap();
        let before = pot.clone();
        assert!(pot.check_properties(&resources).is_err());
        assert_eq!(pot, before);

        let valid = before
            .with_property("sprite", "entities/pot")
            .unwrap();
        let snapshot = valid.clone();
        assert!(valid.check_properties(&resources).is_ok());
        assert_eq!(valid, snapshot);
    }

    #[test]
    fn test_notify_property_changed_clears_unknown_sprite() {
        let resources = resources();
        let mut pot = MapEntity::new(EntityId(1), EntityKind::Destructible);

        let value = PropertyValue::from("entities/pot");
        pot.replace_property("sprite", value.clone()).unwrap();
        pot.notify_property_changed("sprite", &value, &resources);
        assert_eq!(pot.sprite().map(|s| s.id.as_str()), Some("entities/pot"));

        let value = PropertyValue::from("entities/nope");
        pot.replace_property("sprite", value.clone()).unwrap();
        pot.notify_property_changed("sprite", &value, &resources);
        assert_eq!(pot.sprite(), None);
        assert_eq!(pot.properties().get_str("sprite"), "entities/nope");
    }

    #[test]
    fn test_tile_conversion_keeps_geometry_and_pattern() {
        let tile = MapEntity::new(EntityId(1), EntityKind::Tile)
            .with_position(32, 48)
            .with_layer(Layer::Intermediate)
            .with_size(24, 16)
            .unwrap()
            .with_property("pattern", "grass")
            .unwrap();

        let dynamic = tile.to_dynamic_tile(EntityId(2)).unwrap();
        assert_eq!(dynamic.kind(), EntityKind::DynamicTile);
        assert_eq!(dynamic.id(), EntityId(2));
        assert_eq!(dynamic.position(), (32, 48));
        assert_eq!(dynamic.size(), (24, 16));
        assert_eq!(dynamic.layer(), Layer::Intermediate);
        assert_eq!(dynamic.properties().get_str("pattern"), "grass");

        let back = dynamic.to_static_tile(EntityId(3)).unwrap();
        assert_eq!(back.kind(), EntityKind::Tile);
        assert!(tile.to_static_tile(EntityId(4)).is_err());
    }
}
