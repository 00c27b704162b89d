//! Bevy systems for handling undo/redo keyboard shortcuts and requests.

use bevy::prelude::*;

use crate::map::Map;

/// Message asking the map to undo its last action
#[derive(Message, Debug, Clone, Copy)]
pub struct UndoRequest;

/// Message asking the map to redo its last undone action
#[derive(Message, Debug, Clone, Copy)]
pub struct RedoRequest;

/// Sent after an undo or redo request was processed
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStateChanged {
    pub can_undo: bool,
    pub can_redo: bool,
}

impl HistoryStateChanged {
    fn of(map: &Map) -> Self {
        Self {
            can_undo: map.can_undo(),
            can_redo: map.can_redo(),
        }
    }
}

/// System to handle undo keyboard shortcut (Ctrl+Z)
pub fn handle_undo(keyboard: Res<ButtonInput<KeyCode>>, mut requests: MessageWriter<UndoRequest>) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Ctrl+Z (without shift) = undo
    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) {
        requests.write(UndoRequest);
    }
}

/// System to handle redo keyboard shortcut (Ctrl+Y or Ctrl+Shift+Z)
pub fn handle_redo(keyboard: Res<ButtonInput<KeyCode>>, mut requests: MessageWriter<RedoRequest>) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Ctrl+Y or Ctrl+Shift+Z = redo
    let redo_pressed = (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ));

    if redo_pressed {
        requests.write(RedoRequest);
    }
}

/// System to undo the last action of the map
pub fn apply_undo_requests(
    mut requests: MessageReader<UndoRequest>,
    mut map: ResMut<Map>,
    mut state: MessageWriter<HistoryStateChanged>,
) {
    for _ in requests.read() {
        let name = map.history().next_undo_name();
        match map.undo() {
            Ok(()) => info!("Undid '{}'", name.unwrap_or("action")),
            Err(e) => warn!("Cannot undo: {}", e),
        }
        state.write(HistoryStateChanged::of(&map));
    }
}

/// System to redo the last undone action of the map
pub fn apply_redo_requests(
    mut requests: MessageReader<RedoRequest>,
    mut map: ResMut<Map>,
    mut state: MessageWriter<HistoryStateChanged>,
) {
    for _ in requests.read() {
        let name = map.history().next_redo_name();
        match map.redo() {
            Ok(()) => info!("Redid '{}'", name.unwrap_or("action")),
            Err(e) => warn!("Cannot redo: {}", e),
        }
        state.write(HistoryStateChanged::of(&map));
    }
}
