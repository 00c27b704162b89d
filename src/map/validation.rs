//! Per-kind property rules.
//!
//! Required-property checks are generic and run before these rules, see
//! [`MapEntity::check_properties`](super::MapEntity::check_properties).

use super::entity::MapEntity;
use super::error::ValidationError;
use super::kinds::EntityKind;
use super::resources::QuestResources;

/// Grounds a destructible can leave behind
pub const GROUNDS: &[&str] = &[
    "empty",
    "traversable",
    "wall",
    "low_wall",
    "deep_water",
    "shallow_water",
    "grass",
    "hole",
    "ice",
    "ladder",
    "prickles",
    "lava",
];

/// Transitions a teletransporter can play
pub const TRANSITIONS: &[&str] = &["immediate", "fade", "scrolling"];

pub(crate) fn check_kind_rules(
    entity: &MapEntity,
    resources: &QuestResources,
) -> Result<(), ValidationError> {
    match entity.kind() {
        EntityKind::Tile | EntityKind::DynamicTile => check_tile(entity, resources),
        EntityKind::Destination => check_optional_sprite(entity, resources),
        EntityKind::Teletransporter => check_teletransporter(entity, resources),
        EntityKind::Sensor => Ok(()),
        EntityKind::Destructible => check_destructible(entity, resources),
        EntityKind::Chest => {
            check_treasure(entity, resources)?;
            check_sprite(entity, resources)
        }
        EntityKind::ShopTreasure => check_shop_treasure(entity, resources),
        EntityKind::Npc => check_npc(entity, resources),
    }
}

/// Savegame variables are identifiers: ASCII letters, digits and
/// underscores, not starting with a digit
pub fn is_valid_savegame_variable(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_tile(entity: &MapEntity, resources: &QuestResources) -> Result<(), ValidationError> {
    let pattern = entity.properties().get_str("pattern");
    if !resources.has_tile_pattern(pattern) {
        return Err(ValidationError::for_property(
            "pattern",
            format!("No such tile pattern in the tileset: '{pattern}'"),
        ));
    }
    Ok(())
}

fn check_treasure(entity: &MapEntity, resources: &QuestResources) -> Result<(), ValidationError> {
    let properties = entity.properties();

    let treasure_name = properties.get_str("treasure_name");
    if !treasure_name.is_empty() && !resources.has_item(treasure_name) {
        return Err(ValidationError::for_property(
            "treasure_name",
            format!("No such item: '{treasure_name}'"),
        ));
    }

    let variant = properties.get_integer("treasure_variant");
    if variant < 1 {
        return Err(ValidationError::for_property(
            "treasure_variant",
            "The treasure variant must be positive",
        ));
    }

    let variable = properties.get_str("treasure_savegame_variable");
    if !variable.is_empty() && !is_valid_savegame_variable(variable) {
        return Err(ValidationError::for_property(
            "treasure_savegame_variable",
            format!("Invalid treasure savegame variable: '{variable}'"),
        ));
    }
    Ok(())
}

fn check_sprite(entity: &MapEntity, resources: &QuestResources) -> Result<(), ValidationError> {
    let sprite = entity.properties().get_str("sprite");
    if !resources.has_sprite(sprite) {
        return Err(ValidationError::for_property(
            "sprite",
            format!("Invalid sprite name: '{sprite}'"),
        ));
    }
    Ok(())
}

fn check_optional_sprite(
    entity: &MapEntity,
    resources: &QuestResources,
) -> Result<(), ValidationError> {
    if entity.properties().get_str("sprite").is_empty() {
        return Ok(());
    }
    check_sprite(entity, resources)
}

fn check_optional_sound(
    entity: &MapEntity,
    property: &str,
    resources: &QuestResources,
) -> Result<(), ValidationError> {
    let sound = entity.properties().get_str(property);
    if !sound.is_empty() && !resources.has_sound(sound) {
        return Err(ValidationError::for_property(
            property,
            format!("No such sound: '{sound}'"),
        ));
    }
    Ok(())
}

fn check_destructible(
    entity: &MapEntity,
    resources: &QuestResources,
) -> Result<(), ValidationError> {
    check_treasure(entity, resources)?;
    check_sprite(entity, resources)?;
    check_optional_sound(entity, "destruction_sound", resources)?;

    let properties = entity.properties();
    if properties.get_integer("weight") < 0 {
        return Err(ValidationError::for_property(
            "weight",
            "The weight cannot be negative",
        ));
    }
    if properties.get_integer("damage_on_enemies") < 0 {
        return Err(ValidationError::for_property(
            "damage_on_enemies",
            "The damage on enemies cannot be negative",
        ));
    }
    let ground = properties.get_str("ground");
    if !GROUNDS.contains(&ground) {
        return Err(ValidationError::for_property(
            "ground",
            format!("Unknown ground: '{ground}'"),
        ));
    }
    Ok(())
}

fn check_shop_treasure(
    entity: &MapEntity,
    resources: &QuestResources,
) -> Result<(), ValidationError> {
    let properties = entity.properties();
    if properties.get_str("treasure_name").is_empty() {
        return Err(ValidationError::for_property(
            "treasure_name",
            "The treasure of a shop treasure cannot be empty",
        ));
    }

    check_treasure(entity, resources)?;

    if properties.get_integer("price") <= 0 {
        return Err(ValidationError::for_property(
            "price",
            "The price must be positive",
        ));
    }

    let dialog = properties.get_str("dialog");
    if dialog.is_empty() {
        return Err(ValidationError::for_property(
            "dialog",
            "No description dialog defined",
        ));
    }
    if !resources.has_dialog(dialog) {
        return Err(ValidationError::for_property(
            "dialog",
            format!("No such dialog: '{dialog}'"),
        ));
    }
    Ok(())
}

fn check_npc(entity: &MapEntity, resources: &QuestResources) -> Result<(), ValidationError> {
    if entity.subtype_name() == Some("usual_npc") {
        if entity.properties().get_str("sprite").is_empty() {
            return Err(ValidationError::for_property(
                "sprite",
                "A usual NPC must have a sprite",
            ));
        }
        check_sprite(entity, resources)?;
    } else {
        check_optional_sprite(entity, resources)?;
    }

    let behavior = entity.properties().get_str("behavior");
    let valid = match behavior.split_once('#') {
        None => behavior == "map",
        Some(("dialog", id)) => resources.has_dialog(id),
        Some(("item", id)) => resources.has_item(id),
        Some(_) => false,
    };
    if !valid {
        return Err(ValidationError::for_property(
            "behavior",
            format!("Invalid NPC behavior: '{behavior}'"),
        ));
    }
    Ok(())
}

fn check_teletransporter(
    entity: &MapEntity,
    resources: &QuestResources,
) -> Result<(), ValidationError> {
    let properties = entity.properties();
    let map = properties.get_str("destination_map");
    if !resources.has_map(map) {
        return Err(ValidationError::for_property(
            "destination_map",
            format!("No such map: '{map}'"),
        ));
    }
    let transition = properties.get_str("transition");
    if !TRANSITIONS.contains(&transition) {
        return Err(ValidationError::for_property(
            "transition",
            format!("Unknown transition: '{transition}'"),
        ));
    }
    check_optional_sound(entity, "sound", resources)
}
