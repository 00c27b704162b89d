//! Entity kinds and their static capability table.
//!
//! Capabilities are type-level: every entity of a kind shares the same
//! answer to "can it be named", "can it be resized", "does it have a
//! direction" and "does it have a subtype", plus the same property
//! declarations. Actions consult this table before touching an attribute.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::StructuralError;
use super::property::PropertyDecl;

/// Type tag of a map entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Tile,
    DynamicTile,
    Destination,
    Teletransporter,
    Sensor,
    Destructible,
    Chest,
    ShopTreasure,
    Npc,
}

/// Directions an entity kind can face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionSet {
    /// 4 or 8
    pub count: u8,
    /// Label of the "no direction" choice, when the kind allows it
    pub none_label: Option<&'static str>,
}

/// Static description of an entity kind
#[derive(Debug)]
pub struct KindInfo {
    pub name: &'static str,
    pub can_have_name: bool,
    pub resizable: bool,
    /// Size of new entities, and the fixed size of non-resizable ones
    pub default_size: (i32, i32),
    pub directions: Option<DirectionSet>,
    pub subtypes: &'static [&'static str],
    pub properties: &'static [PropertyDecl],
}

const TREASURE_SAVEGAME_VARIABLE: &str = "treasure_savegame_variable";

static TILE: KindInfo = KindInfo {
    name: "tile",
    can_have_name: false,
    resizable: true,
    default_size: (16, 16),
    directions: None,
    subtypes: &[],
    properties: &[PropertyDecl::string("pattern", true, "")],
};

static DYNAMIC_TILE: KindInfo = KindInfo {
    name: "dynamic_tile",
    can_have_name: true,
    resizable: true,
    default_size: (16, 16),
    directions: None,
    subtypes: &[],
    properties: &[
        PropertyDecl::string("pattern", true, ""),
        PropertyDecl::boolean("enabled_at_start", false, true),
    ],
};

static DESTINATION: KindInfo = KindInfo {
    name: "destination",
    can_have_name: true,
    resizable: false,
    default_size: (16, 16),
    directions: Some(DirectionSet {
        count: 4,
        none_label: Some("Keep the same direction"),
    }),
    subtypes: &[],
    properties: &[
        PropertyDecl::string("sprite", false, ""),
        PropertyDecl::boolean("default", false, false),
    ],
};

static TELETRANSPORTER: KindInfo = KindInfo {
    name: "teletransporter",
    can_have_name: true,
    resizable: true,
    default_size: (16, 16),
    directions: None,
    subtypes: &["invisible", "yellow"],
    properties: &[
        PropertyDecl::string("destination_map", true, ""),
        PropertyDecl::string("destination", false, ""),
        PropertyDecl::string("transition", true, "fade"),
        PropertyDecl::string("sound", false, ""),
    ],
};

static SENSOR: KindInfo = KindInfo {
    name: "sensor",
    can_have_name: true,
    resizable: true,
    default_size: (16, 16),
    directions: None,
    subtypes: &[],
    properties: &[],
};

static DESTRUCTIBLE: KindInfo = KindInfo {
    name: "destructible",
    can_have_name: true,
    resizable: false,
    default_size: (16, 16),
    directions: None,
    subtypes: &[],
    properties: &[
        PropertyDecl::string("treasure_name", false, ""),
        PropertyDecl::integer("treasure_variant", false, 1),
        PropertyDecl::string(TREASURE_SAVEGAME_VARIABLE, false, ""),
        PropertyDecl::string("sprite", true, ""),
        PropertyDecl::string("destruction_sound", false, ""),
        PropertyDecl::integer("weight", false, 0),
        PropertyDecl::boolean("can_be_cut", false, false),
        PropertyDecl::boolean("can_explode", false, false),
        PropertyDecl::boolean("can_regenerate", false, false),
        PropertyDecl::integer("damage_on_enemies", false, 1),
        PropertyDecl::string("ground", true, "wall"),
    ],
};

static CHEST: KindInfo = KindInfo {
    name: "chest",
    can_have_name: true,
    resizable: false,
    default_size: (16, 16),
    directions: None,
    subtypes: &[],
    properties: &[
        PropertyDecl::string("treasure_name", false, ""),
        PropertyDecl::integer("treasure_variant", false, 1),
        PropertyDecl::string(TREASURE_SAVEGAME_VARIABLE, false, ""),
        PropertyDecl::string("sprite", true, "entities/chest"),
    ],
};

static SHOP_TREASURE: KindInfo = KindInfo {
    name: "shop_treasure",
    can_have_name: true,
    resizable: false,
    default_size: (32, 32),
    directions: None,
    subtypes: &[],
    properties: &[
        PropertyDecl::string("treasure_name", true, ""),
        PropertyDecl::integer("treasure_variant", false, 1),
        PropertyDecl::string(TREASURE_SAVEGAME_VARIABLE, false, ""),
        PropertyDecl::integer("price", true, 0),
        PropertyDecl::string("dialog", true, ""),
    ],
};

static NPC: KindInfo = KindInfo {
    name: "npc",
    can_have_name: true,
    resizable: false,
    default_size: (16, 16),
    directions: Some(DirectionSet {
        count: 4,
        none_label: Some("Any"),
    }),
    subtypes: &["generalized_npc", "usual_npc"],
    properties: &[
        PropertyDecl::string("sprite", false, ""),
        PropertyDecl::string("behavior", true, "map"),
    ],
};

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Tile,
            EntityKind::DynamicTile,
            EntityKind::Destination,
            EntityKind::Teletransporter,
            EntityKind::Sensor,
            EntityKind::Destructible,
            EntityKind::Chest,
            EntityKind::ShopTreasure,
            EntityKind::Npc,
        ]
    }

    pub fn info(&self) -> &'static KindInfo {
        match self {
            EntityKind::Tile => &TILE,
            EntityKind::DynamicTile => &DYNAMIC_TILE,
            EntityKind::Destination => &DESTINATION,
            EntityKind::Teletransporter => &TELETRANSPORTER,
            EntityKind::Sensor => &SENSOR,
            EntityKind::Destructible => &DESTRUCTIBLE,
            EntityKind::Chest => &CHEST,
            EntityKind::ShopTreasure => &SHOP_TREASURE,
            EntityKind::Npc => &NPC,
        }
    }

    pub fn can_have_name(&self) -> bool {
        self.info().can_have_name
    }

    pub fn is_resizable(&self) -> bool {
        self.info().resizable
    }

    pub fn has_direction_property(&self) -> bool {
        self.info().directions.is_some()
    }

    pub fn has_subtype(&self) -> bool {
        !self.info().subtypes.is_empty()
    }

    /// Whether the kind carries properties beyond the common attributes
    pub fn has_specific_properties(&self) -> bool {
        !self.info().properties.is_empty()
    }

    pub fn is_tile(&self) -> bool {
        matches!(self, EntityKind::Tile | EntityKind::DynamicTile)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// Checks the kind table for inconsistent declarations.
///
/// Run once when the editor starts.
pub fn validate_kind_table() -> Result<(), StructuralError> {
    for kind in EntityKind::all() {
        let info = kind.info();
        let mut names = HashSet::new();
        for decl in info.properties {
            if !names.insert(decl.name) {
                return Err(StructuralError::BadKindTable(format!(
                    "{} declares '{}' twice",
                    info.name, decl.name
                )));
            }
            if decl.default.kind() != decl.kind {
                return Err(StructuralError::BadKindTable(format!(
                    "{}: default of '{}' is not a {} value",
                    info.name,
                    decl.name,
                    decl.kind.as_str()
                )));
            }
        }
        if let Some(directions) = info.directions
            && directions.count != 4
            && directions.count != 8
        {
            return Err(StructuralError::BadKindTable(format!(
                "{} has {} directions",
                info.name, directions.count
            )));
        }
        let (width, height) = info.default_size;
        if width <= 0 || height <= 0 {
            return Err(StructuralError::BadKindTable(format!(
                "{} has an empty default size",
                info.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table_is_consistent() {
        assert_eq!(validate_kind_table(), Ok(()));
    }

    #[test]
    fn test_static_tiles_cannot_be_named() {
        assert!(!EntityKind::Tile.can_have_name());
        assert!(EntityKind::DynamicTile.can_have_name());
    }

    #[test]
    fn test_capabilities() {
        assert!(EntityKind::Sensor.is_resizable());
        assert!(!EntityKind::Destructible.is_resizable());
        assert!(EntityKind::Npc.has_direction_property());
        assert!(EntityKind::Npc.has_subtype());
        assert!(!EntityKind::Chest.has_subtype());
        assert!(!EntityKind::Sensor.has_specific_properties());
        assert!(EntityKind::ShopTreasure.has_specific_properties());
    }

    #[test]
    fn test_shop_treasure_has_fixed_32px_size() {
        assert_eq!(EntityKind::ShopTreasure.info().default_size, (32, 32));
    }

    #[test]
    fn test_required_flags_on_numeric_properties() {
        let required = |kind: EntityKind, name: &str| {
            kind.info()
                .properties
                .iter()
                .find(|decl| decl.name == name)
                .map(|decl| decl.required)
        };
        assert_eq!(required(EntityKind::ShopTreasure, "price"), Some(true));
        assert_eq!(required(EntityKind::ShopTreasure, "treasure_variant"), Some(false));
        assert_eq!(required(EntityKind::Destructible, "weight"), Some(false));
        assert_eq!(required(EntityKind::Destructible, "can_be_cut"), Some(false));
    }

    #[test]
    fn test_display_uses_kind_name() {
        assert_eq!(EntityKind::ShopTreasure.to_string(), "shop_treasure");
        assert_eq!(EntityKind::DynamicTile.to_string(), "dynamic_tile");
    }
}
