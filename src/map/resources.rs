//! Catalog of the quest resources map entities can refer to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Ids of the quest resources known to the editor.
///
/// Reference checks and sprite resolution look names up here. Scanning
/// the quest directory to fill it is the job of the project browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestResources {
    #[serde(default)]
    pub sprites: BTreeSet<String>,
    #[serde(default)]
    pub dialogs: BTreeSet<String>,
    #[serde(default)]
    pub items: BTreeSet<String>,
    #[serde(default)]
    pub sounds: BTreeSet<String>,
    #[serde(default)]
    pub maps: BTreeSet<String>,
    /// Pattern ids of the map's tileset
    #[serde(default)]
    pub tile_patterns: BTreeSet<String>,
}

impl QuestResources {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn has_sprite(&self, id: &str) -> bool {
        self.sprites.contains(id)
    }

    pub fn has_dialog(&self, id: &str) -> bool {
        self.dialogs.contains(id)
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn has_sound(&self, id: &str) -> bool {
        self.sounds.contains(id)
    }

    pub fn has_map(&self, id: &str) -> bool {
        self.maps.contains(id)
    }

    pub fn has_tile_pattern(&self, id: &str) -> bool {
        self.tile_patterns.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_with_missing_sections() {
        let resources = QuestResources::from_json(
            r#"{ "sprites": ["entities/pot"], "items": ["rupee"] }"#,
        )
        .unwrap();
        assert!(resources.has_sprite("entities/pot"));
        assert!(resources.has_item("rupee"));
        assert!(!resources.has_dialog("rupee"));
        assert!(resources.maps.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        let resources = QuestResources::default();
        assert!(!resources.has_sprite(""));
        assert!(resources.tile_patterns.is_empty());
    }
}
