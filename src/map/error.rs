//! Error types for the entity model and the action history.

use std::path::PathBuf;

use thiserror::Error;

use super::entity::EntityId;
use super::kinds::EntityKind;

/// A property bundle that breaks the rules of its entity kind.
///
/// Only raised by explicit validity checks, never by an undo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    /// The offending property, when the failure is about a single one
    pub property: Option<String>,
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            property: None,
            reason: reason.into(),
        }
    }

    pub fn for_property(property: &str, reason: impl Into<String>) -> Self {
        Self {
            property: Some(property.to_string()),
            reason: reason.into(),
        }
    }
}

/// An operation the entity kind does not support, or a value outside
/// the structural limits of the entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("{kind} entities cannot be resized")]
    NotResizable { kind: EntityKind },
    #[error("{kind} entities cannot have a name")]
    NoName { kind: EntityKind },
    #[error("{kind} entities have no direction")]
    NoDirection { kind: EntityKind },
    #[error("{kind} entities have no subtype")]
    NoSubtype { kind: EntityKind },
    #[error("invalid size {width}x{height}: must be positive multiples of {step}")]
    InvalidSize { width: i32, height: i32, step: i32 },
    #[error("invalid direction {direction} for {kind}")]
    InvalidDirection { kind: EntityKind, direction: String },
    #[error("invalid subtype {subtype} for {kind}")]
    InvalidSubtype { kind: EntityKind, subtype: u8 },
    #[error("an entity named '{0}' already exists on this map")]
    DuplicateName(String),
    #[error("{kind} entities have no property '{name}'")]
    UnknownProperty { kind: EntityKind, name: String },
    #[error("no property named '{0}' is declared")]
    UndeclaredProperty(String),
    #[error("property '{name}' expects a {expected} value")]
    PropertyKindMismatch { name: String, expected: &'static str },
    #[error("position ({x}, {y}) puts the entity outside the map")]
    OutsideMap { x: i32, y: i32 },
    #[error("{kind} entities cannot be converted this way")]
    NotConvertible { kind: EntityKind },
    #[error("bad entity kind table: {0}")]
    BadKindTable(String),
}

/// Failure to apply or revert an action. A history submission that fails
/// with this error leaves the map untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("entity {0} does not exist on this map")]
    UnknownEntity(EntityId),
    #[error("entity {0} is already on this map")]
    EntityAlreadyPresent(EntityId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("an action is already being applied")]
    Reentrant,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Failure to read the resource catalog of a quest
#[derive(Debug, Error)]
pub enum ResourceLoadError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid resource catalog {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
