use serde_json::{Map, Value};

use crate::entity_catalog::{EntitySchema, EntityType, ID_PROPERTY};
use crate::expand_compiler::ExpandTree;
use crate::store::BindingRow;
use crate::variable_mapping::{MappingArena, MappingId};

use super::entity_collection::{Entity, EntityCollection};
use super::errors::DecodeError;

fn bound<'r>(row: &'r BindingRow, variable: &str) -> Option<&'r str> {
    row.get(variable.trim_start_matches('?'))
        .map(|binding| binding.value.as_str())
}

/// Folds result rows back into nested entities, reading the variables the
/// compiler allocated in `arena`.
pub struct ResultDecoder<'a> {
    schema: &'a EntitySchema,
    arena: &'a MappingArena,
}

impl<'a> ResultDecoder<'a> {
    pub fn new(schema: &'a EntitySchema, arena: &'a MappingArena) -> Self {
        ResultDecoder { schema, arena }
    }

    /// Group `rows` into entities of `entity_type` and serialize them in the
    /// order their ids first appear.
    pub fn decode(
        &self,
        entity_type: &EntityType,
        expand: &ExpandTree,
        root: MappingId,
        rows: &[BindingRow],
    ) -> Result<Vec<Value>, DecodeError> {
        let collection = self.collect(entity_type, expand, root, rows)?;
        self.serialize_collection(&collection, entity_type, expand)
    }

    pub fn collect(
        &self,
        entity_type: &EntityType,
        expand: &ExpandTree,
        root: MappingId,
        rows: &[BindingRow],
    ) -> Result<EntityCollection, DecodeError> {
        let mut collection = EntityCollection::new();
        for row in rows {
            if !self.route_row(&mut collection, entity_type, expand, root, row)? {
                log::warn!("Result row binds no {} id; skipped", entity_type);
            }
        }
        log::debug!(
            "ResultDecoder: {} rows → {} {} entities",
            rows.len(),
            collection.len(),
            entity_type
        );
        Ok(collection)
    }

    fn variable(
        &self,
        entity_type: &EntityType,
        mapping: MappingId,
        property: &str,
    ) -> Result<&'a str, DecodeError> {
        self.arena
            .get_elementary(mapping, property)
            .ok_or_else(|| DecodeError::MissingVariable {
                entity_type: entity_type.name.clone(),
                property: property.to_string(),
            })
    }

    /// Route one row into `collection`. Returns false when the row does not bind
    /// this level's id, i.e. it belongs to a sibling union alternative.
    fn route_row(
        &self,
        collection: &mut EntityCollection,
        entity_type: &EntityType,
        expand: &ExpandTree,
        mapping: MappingId,
        row: &BindingRow,
    ) -> Result<bool, DecodeError> {
        let id_variable = self.variable(entity_type, mapping, ID_PROPERTY)?;
        let Some(id) = bound(row, id_variable) else {
            return Ok(false);
        };
        let entity = collection.entry(id);

        for property in entity_type.properties() {
            if property.is_elementary() {
                let variable = self.variable(entity_type, mapping, &property.name)?;
                if let Some(value) = bound(row, variable) {
                    if let Some(first) = entity.assign(&property.name, value) {
                        return Err(DecodeError::InconsistentResult {
                            entity_type: entity_type.name.clone(),
                            id: id.to_string(),
                            property: property.name.clone(),
                            first,
                            second: value.to_string(),
                        });
                    }
                }
            } else if let Some(sub_expand) = expand.child(&property.name) {
                let child_mapping = self
                    .arena
                    .get_complex(mapping, &property.name)
                    .ok_or_else(|| DecodeError::MissingVariable {
                        entity_type: entity_type.name.clone(),
                        property: property.name.clone(),
                    })?;
                let target = self.schema.target_type(property)?;
                let children = entity.navigation_mut(&property.name);
                self.route_row(children, target, sub_expand, child_mapping, row)?;

                if property.is_cardinality_one() && children.len() > 1 {
                    let mut ids = children.ids();
                    return Err(DecodeError::InconsistentResult {
                        entity_type: entity_type.name.clone(),
                        id: id.to_string(),
                        property: property.name.clone(),
                        first: ids.next().unwrap_or_default().to_string(),
                        second: ids.next().unwrap_or_default().to_string(),
                    });
                }
            }
        }
        Ok(true)
    }

    pub fn serialize_collection(
        &self,
        collection: &EntityCollection,
        entity_type: &EntityType,
        expand: &ExpandTree,
    ) -> Result<Vec<Value>, DecodeError> {
        collection
            .iter()
            .map(|(_, entity)| self.serialize_entity(entity, entity_type, expand))
            .collect()
    }

    /// Properties in schema order; single-valued navigations become an object or
    /// `null`, collections an array.
    fn serialize_entity(
        &self,
        entity: &Entity,
        entity_type: &EntityType,
        expand: &ExpandTree,
    ) -> Result<Value, DecodeError> {
        let mut object = Map::new();
        for property in entity_type.properties() {
            if property.is_elementary() {
                let value = entity
                    .value(&property.name)
                    .map_or(Value::Null, |v| Value::String(v.to_string()));
                object.insert(property.name.clone(), value);
            } else if let Some(sub_expand) = expand.child(&property.name) {
                let target = self.schema.target_type(property)?;
                let items = match entity.navigation(&property.name) {
                    Some(children) => self.serialize_collection(children, target, sub_expand)?,
                    None => Vec::new(),
                };
                let value = if property.is_cardinality_one() {
                    items.into_iter().next().unwrap_or(Value::Null)
                } else {
                    Value::Array(items)
                };
                object.insert(property.name.clone(), value);
            }
        }
        Ok(Value::Object(object))
    }
}
