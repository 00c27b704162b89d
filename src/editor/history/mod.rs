//! Undo/Redo system for map edits.
//!
//! Every reversible edit of a [`Map`](crate::map::Map) is an [`Action`]
//! submitted with [`Map::do_action`](crate::map::Map::do_action). The map
//! records it in its [`CommandHistory`], which undoes and redoes actions
//! in a single linear sequence.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last action
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone action
//!
//! ## Supported Operations
//!
//! - Editing all attributes and properties of one entity
//! - Changing the layer or direction of several entities
//! - Bringing entities to the front or back of their layer
//! - Replacing an entity, e.g. converting static and dynamic tiles
//! - Adding, removing, moving and resizing entities
//!
//! ## Module Structure
//!
//! - [`action`] - The `Action` trait and shared helpers
//! - [`command_history`] - CommandHistory with cursor, size limit and save point
//! - [`edit_entity`] - Composite edit of one entity
//! - [`specific`] - Kind-specific property edits
//! - [`systems`] - Bevy systems for keyboard shortcuts and requests

mod action;
mod add_remove;
mod change_direction;
mod change_layer;
mod command_history;
mod edit_entity;
mod move_entities;
mod replace_entity;
mod resize_entity;
mod specific;
mod systems;
mod z_order;


// Re-exports
pub use action::{Action, Change};
pub use add_remove::{AddEntities, RemoveEntities};
pub use change_direction::ChangeDirection;
pub use change_layer::ChangeLayer;
pub use command_history::CommandHistory;
pub use edit_entity::{EditEntity, EditEntityBuilder};
pub use move_entities::MoveEntities;
pub use replace_entity::ReplaceEntity;
pub use resize_entity::ResizeEntities;
pub use specific::{specific_action_for, EditProperties, SpecificAction};
pub use systems::{
    apply_redo_requests, apply_undo_requests, handle_redo, handle_undo, HistoryStateChanged,
    RedoRequest, UndoRequest,
};
pub use z_order::{BringToBack, BringToFront};
