//! Editing all attributes of one entity at once.

use crate::map::{
    Direction, EditError, EntityId, Layer, Map, PropertyValue, StructuralError, Subtype,
};

use super::action::{Action, Change};
use super::specific::{specific_action_for, SpecificAction};

/// Edits the common attributes of an entity (name, layer, position, size,
/// direction, subtype) and its kind-specific properties.
///
/// Attributes the entity kind does not support are never captured nor
/// restored. Built with [`EditEntity::builder`].
#[derive(Debug)]
pub struct EditEntity {
    entity: EntityId,
    name: Option<Change<Option<String>>>,
    layer: Change<Layer>,
    /// Z-index of the entity in its layer before the edit
    index_before: usize,
    position: Change<(i32, i32)>,
    size: Option<Change<(i32, i32)>>,
    direction: Option<Change<Direction>>,
    subtype: Option<Change<Subtype>>,
    specific: Option<Box<dyn SpecificAction>>,
}

impl EditEntity {
    /// Starts an edit from the current state of `entity`
    pub fn builder(map: &Map, entity: EntityId) -> Result<EditEntityBuilder, EditError> {
        let current = map.get(entity)?;
        let (layer, index) = map
            .z_position(entity)
            .ok_or(EditError::UnknownEntity(entity))?;
        Ok(EditEntityBuilder {
            edit: EditEntity {
                entity,
                name: current
                    .can_have_name()
                    .then(|| Change::unchanged(current.name().map(str::to_string))),
                layer: Change::unchanged(layer),
                index_before: index,
                position: Change::unchanged(current.position()),
                size: current
                    .is_resizable()
                    .then(|| Change::unchanged(current.size())),
                direction: current.direction().map(Change::unchanged),
                subtype: current.subtype().map(Change::unchanged),
                specific: None,
            },
            properties: Vec::new(),
            custom: None,
        })
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

impl Action for EditEntity {
    fn name(&self) -> &'static str {
        "Edit entity"
    }

    fn execute(&mut self, map: &mut Map) -> Result<(), EditError> {
        let id = self.entity;

        if let Some(name) = &self.name {
            map.set_entity_name(id, name.after.clone())?;
        }

        map.set_entity_layer(id, self.layer.after)?;

        let (x, y) = self.position.after;
        map.set_entity_position(id, x, y)?;

        if let Some(size) = &self.size {
            let (width, height) = size.after;
            map.set_entity_size(id, width, height)?;
        }

        if let Some(direction) = &self.direction {
            map.set_entity_direction(id, direction.after)?;
        }

        if let Some(subtype) = &self.subtype {
            map.set_entity_subtype(id, subtype.after)?;
        }

        if let Some(specific) = self.specific.as_mut() {
            specific.execute(map, id)?;
        }

        map.check_entity(id)?;
        map.refresh_entity(id);
        Ok(())
    }

    fn undo(&mut self, map: &mut Map) -> Result<(), EditError> {
        let id = self.entity;
        map.get(id)?;

        if let Some(specific) = self.specific.as_mut() {
            specific.undo(map, id)?;
        }

        if let Some(subtype) = &self.subtype {
            map.set_entity_subtype(id, subtype.before)?;
        }

        if let Some(direction) = &self.direction {
            map.set_entity_direction(id, direction.before)?;
        }

        // Sizes and positions come back even if they were invalid before.
        if let Some(size) = &self.size {
            let (width, height) = size.before;
            map.set_entity_size_unchecked(id, width, height)?;
        }

        let (x, y) = self.position.before;
        map.set_entity_position_unchecked(id, x, y)?;

        map.restore_z_positions(&[(id, self.layer.before, self.index_before)])?;

        if let Some(name) = &self.name {
            map.set_entity_name(id, name.before.clone())?;
        }

        // No property check here: an entity that was invalid before the
        // edit goes back to being invalid.
        map.refresh_entity(id);
        Ok(())
    }
}

/// Collects the after values of an [`EditEntity`].
///
/// Every setter refuses attributes the entity kind does not support.
#[derive(Debug)]
pub struct EditEntityBuilder {
    edit: EditEntity,
    properties: Vec<(String, PropertyValue)>,
    custom: Option<Box<dyn SpecificAction>>,
}

impl EditEntityBuilder {
    pub fn name(mut self, name: Option<String>, map: &Map) -> Result<Self, EditError> {
        let entity = map.get(self.edit.entity)?;
        match self.edit.name.as_mut() {
            Some(change) => change.after = name,
            None => return Err(StructuralError::NoName { kind: entity.kind() }.into()),
        }
        Ok(self)
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.edit.layer.after = layer;
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.edit.position.after = (x, y);
        self
    }

    pub fn size(mut self, width: i32, height: i32, map: &Map) -> Result<Self, EditError> {
        let entity = map.get(self.edit.entity)?;
        match self.edit.size.as_mut() {
            Some(change) => change.after = (width, height),
            None => return Err(StructuralError::NotResizable { kind: entity.kind() }.into()),
        }
        Ok(self)
    }

    pub fn direction(mut self, direction: Direction, map: &Map) -> Result<Self, EditError> {
        let entity = map.get(self.edit.entity)?;
        entity.check_direction(direction)?;
        if let Some(change) = self.edit.direction.as_mut() {
            change.after = direction;
        }
        Ok(self)
    }

    pub fn subtype(mut self, subtype: Subtype, map: &Map) -> Result<Self, EditError> {
        let entity = map.get(self.edit.entity)?;
        entity.check_subtype(subtype)?;
        if let Some(change) = self.edit.subtype.as_mut() {
            change.after = subtype;
        }
        Ok(self)
    }

    /// Sets a kind-specific property
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Uses `specific` instead of the sub-edit chosen from the entity kind
    pub fn specific(mut self, specific: Box<dyn SpecificAction>) -> Self {
        self.custom = Some(specific);
        self
    }

    /// Builds the action, selecting the kind-specific sub-edit
    pub fn build(mut self, map: &Map) -> Result<EditEntity, EditError> {
        let entity = map.get(self.edit.entity)?;
        self.edit.specific = match self.custom {
            Some(custom) if self.properties.is_empty() => Some(custom),
            Some(_) => {
                let (name, _) = &self.properties[0];
                return Err(StructuralError::UnknownProperty {
                    kind: entity.kind(),
                    name: name.clone(),
                }
                .into());
            }
            None => specific_action_for(entity, self.properties)?,
        };
        Ok(self.edit)
    }
}
