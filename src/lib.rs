//! Quest map editing engine: the entity model of a map, property
//! validation, and a reversible action history with undo and redo.

pub mod config;
pub mod constants;
pub mod editor;
pub mod map;
pub mod paths;
