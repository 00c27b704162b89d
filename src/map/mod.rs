//! Entity model of a quest map.
//!
//! ## Module Structure
//!
//! - [`layer`] - Drawing layers
//! - [`property`] - Typed property values and declarations
//! - [`kinds`] - Entity kinds and their capability table
//! - [`entity`] - Placeable entities
//! - [`validation`] - Per-kind property rules
//! - [`resources`] - Quest resource catalog used by validation
//! - [`map_data`] - The map: entity storage, selection, history, notifications
//!
//! [`MapPlugin`] puts a [`Map`] resource in the Bevy app, sized and
//! stocked from the loaded configuration. An [`OpenQuestRequest`] swaps in
//! the resource catalog of another quest directory.

mod entity;
mod error;
pub mod kinds;
mod layer;
mod map_data;
mod notify;
pub mod property;
mod resources;
mod selection;
pub mod validation;

pub use entity::{Direction, EntityId, MapEntity, SpriteRef, Subtype};
pub use error::{EditError, ResourceLoadError, StructuralError, ValidationError};
pub use kinds::{validate_kind_table, DirectionSet, EntityKind, KindInfo};
pub use layer::Layer;
pub use map_data::{check_size, Map};
pub use notify::{ListenerId, MapChange, MapListener};
pub use property::{PropertyBundle, PropertyDecl, PropertyKind, PropertyValue};
pub use resources::QuestResources;
pub use selection::Selection;

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded, UpdateLastQuestPathRequest};

/// Startup system checking the static entity kind table
fn check_kind_table() {
    match validate_kind_table() {
        Ok(()) => debug!("Entity kind table is consistent"),
        Err(e) => error!("{}", e),
    }
}

/// Name of the resource catalog inside a quest directory
pub const QUEST_RESOURCES_FILE: &str = "resources.json";

/// Reads the resource catalog of a quest directory
pub fn load_quest_resources(quest_dir: &Path) -> Result<QuestResources, ResourceLoadError> {
    let path = quest_dir.join(QUEST_RESOURCES_FILE);
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(source) => return Err(ResourceLoadError::Read { path, source }),
    };
    QuestResources::from_json(&json).map_err(|source| ResourceLoadError::Parse { path, source })
}

/// Message to load the resource catalog of a quest directory into the map
#[derive(Message)]
pub struct OpenQuestRequest {
    pub path: PathBuf,
}

fn open_quest(map: &mut Map, quest_dir: &Path) -> bool {
    match load_quest_resources(quest_dir) {
        Ok(resources) => {
            info!("Loaded quest resources from {:?}", quest_dir);
            map.set_resources(resources);
            true
        }
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}

/// Startup system preparing the edited map from the loaded config
fn setup_map(config: Res<AppConfig>, mut map: ResMut<Map>) {
    let limit = config.data.history_limit;
    let fresh = std::mem::take(&mut *map);
    *map = fresh.with_history_limit(limit);
    info!("Undo history limited to {} actions", limit);

    if let Some(quest_dir) = &config.data.last_quest_path {
        open_quest(&mut map, quest_dir);
    }
}

/// System loading a requested quest and remembering it in the config
fn open_quest_system(
    mut events: MessageReader<OpenQuestRequest>,
    mut map: ResMut<Map>,
    mut config_events: MessageWriter<UpdateLastQuestPathRequest>,
) {
    for event in events.read() {
        if open_quest(&mut map, &event.path) {
            config_events.write(UpdateLastQuestPathRequest {
                path: event.path.clone(),
            });
        }
    }
}

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Map>()
            .add_message::<OpenQuestRequest>()
            .add_systems(
                Startup,
                (check_kind_table, setup_map.after(ConfigLoaded)),
            )
            .add_systems(
                Update,
                open_quest_system.run_if(on_message::<OpenQuestRequest>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;

    fn quest_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("questforge-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(QUEST_RESOURCES_FILE),
            r#"{ "items": ["sword"], "sprites": ["entities/chest"] }"#,
        )
        .unwrap();
        dir
    }

    fn quest_app() -> App {
        let mut app = App::new();
        app.init_resource::<Map>()
            .add_message::<OpenQuestRequest>()
            .add_message::<UpdateLastQuestPathRequest>()
            .add_systems(Update, open_quest_system);
        app
    }

    #[test]
    fn test_load_quest_resources() {
        let dir = quest_dir("quest");
        let resources = load_quest_resources(&dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert!(resources.has_item("sword"));
        assert!(resources.has_sprite("entities/chest"));
        assert!(!resources.has_dialog("intro"));
    }

    #[test]
    fn test_missing_quest_resources() {
        let dir = std::env::temp_dir().join("questforge-no-such-quest");
        assert!(matches!(
            load_quest_resources(&dir),
            Err(ResourceLoadError::Read { .. })
        ));
    }

    #[test]
    fn test_open_quest_request_loads_resources() {
        let dir = quest_dir("open");
        let mut app = quest_app();
        app.world_mut()
            .write_message(OpenQuestRequest { path: dir.clone() });
        app.update();
        std::fs::remove_dir_all(&dir).ok();

        let map = app.world().resource::<Map>();
        assert!(map.resources().has_item("sword"));
        assert!(map.resources().has_sprite("entities/chest"));
        let remembered = app
            .world()
            .resource::<Messages<UpdateLastQuestPathRequest>>();
        assert_eq!(remembered.len(), 1);
    }

    #[test]
    fn test_open_missing_quest_keeps_resources() {
        let mut app = quest_app();
        app.world_mut().write_message(OpenQuestRequest {
            path: std::env::temp_dir().join("questforge-no-such-quest"),
        });
        app.update();

        assert!(!app.world().resource::<Map>().resources().has_item("sword"));
        let remembered = app
            .world()
            .resource::<Messages<UpdateLastQuestPathRequest>>();
        assert!(remembered.is_empty());
    }
}
