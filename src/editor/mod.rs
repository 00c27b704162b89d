//! Editing the map: the undo/redo history and its Bevy wiring.

pub mod history;

use bevy::prelude::*;

use history::{HistoryStateChanged, RedoRequest, UndoRequest};

/// Log history state changes for debugging
fn log_history_state(mut events: MessageReader<HistoryStateChanged>) {
    for event in events.read() {
        debug!(
            "History state: can_undo={}, can_redo={}",
            event.can_undo, event.can_redo
        );
    }
}

pub struct MapEditorPlugin;

impl Plugin for MapEditorPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_message::<HistoryStateChanged>()
            .add_systems(
                Update,
                (
                    (history::handle_undo, history::handle_redo),
                    (
                        history::apply_undo_requests.run_if(on_message::<UndoRequest>),
                        history::apply_redo_requests.run_if(on_message::<RedoRequest>),
                    ),
                    log_history_state.run_if(on_message::<HistoryStateChanged>),
                )
                    .chain(),
            );
    }
}
