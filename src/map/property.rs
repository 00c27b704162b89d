//! Typed property bundles of map entities.

use serde::{Deserialize, Serialize};

use super::error::StructuralError;

/// Value kinds a property can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    String,
    Integer,
    Boolean,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Boolean => "boolean",
        }
    }
}

/// A property value. An empty string means the property is unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Compile-time default of a declared property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDefault {
    String(&'static str),
    Integer(i64),
    Boolean(bool),
}

impl PropertyDefault {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyDefault::String(_) => PropertyKind::String,
            PropertyDefault::Integer(_) => PropertyKind::Integer,
            PropertyDefault::Boolean(_) => PropertyKind::Boolean,
        }
    }

    pub fn to_value(self) -> PropertyValue {
        match self {
            PropertyDefault::String(s) => PropertyValue::String(s.to_string()),
            PropertyDefault::Integer(i) => PropertyValue::Integer(i),
            PropertyDefault::Boolean(b) => PropertyValue::Boolean(b),
        }
    }
}

/// Static declaration of a property of an entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: &'static str,
    pub kind: PropertyKind,
    /// Must be present in map data; a required string must also not be empty
    pub required: bool,
    pub default: PropertyDefault,
}

impl PropertyDecl {
    pub const fn string(name: &'static str, required: bool, default: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::String,
            required,
            default: PropertyDefault::String(default),
        }
    }

    pub const fn integer(name: &'static str, required: bool, default: i64) -> Self {
        Self {
            name,
            kind: PropertyKind::Integer,
            required,
            default: PropertyDefault::Integer(default),
        }
    }

    pub const fn boolean(name: &'static str, required: bool, default: bool) -> Self {
        Self {
            name,
            kind: PropertyKind::Boolean,
            required,
            default: PropertyDefault::Boolean(default),
        }
    }
}

/// Property values of one entity, kept in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyBundle {
    entries: Vec<(&'static str, PropertyValue)>,
}

impl PropertyBundle {
    /// Builds a bundle holding the default of every declaration
    pub fn from_decls(decls: &[PropertyDecl]) -> Self {
        Self {
            entries: decls
                .iter()
                .map(|decl| (decl.name, decl.default.to_value()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, name: &str) -> &str {
        self.get(name).and_then(PropertyValue::as_str).unwrap_or("")
    }

    pub fn get_integer(&self, name: &str) -> i64 {
        self.get(name)
            .and_then(PropertyValue::as_integer)
            .unwrap_or_default()
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name)
            .and_then(PropertyValue::as_bool)
            .unwrap_or_default()
    }

    /// Replaces the value of a declared property, returning the previous one.
    ///
    /// The new value must have the kind of the current one.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> Result<PropertyValue, StructuralError> {
        let Some((_, slot)) = self.entries.iter_mut().find(|(n, _)| *n == name) else {
            return Err(StructuralError::UndeclaredProperty(name.to_string()));
        };
        if slot.kind() != value.kind() {
            return Err(StructuralError::PropertyKindMismatch {
                name: name.to_string(),
                expected: slot.kind().as_str(),
            });
        }
        Ok(std::mem::replace(slot, value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
