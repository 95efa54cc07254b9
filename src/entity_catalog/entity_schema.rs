use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::errors::SchemaError;

/// Name of the identifier property every entity type exposes.
pub const ID_PROPERTY: &str = "Id";

/// Namespace used for the `rdf:type` leaf of typed entity types.
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Primitive types are registered in every schema and are always elementary.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "Edm.String",
    "Edm.Int32",
    "Edm.Int64",
    "Edm.Boolean",
    "Edm.Decimal",
    "Edm.Double",
    "Edm.DateTimeOffset",
    "Edm.Guid",
];

/// Prefixed names (`disco:content`) are the only form in which schema text reaches
/// a generated query, so predicates and classes must match this exactly.
static PREFIXED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*):[A-Za-z_][A-Za-z0-9_-]*$").unwrap()
});

/// Namespace IRIs end up inside `<...>` in the PREFIX header.
static NAMESPACE_IRI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^<>"{}|^`\\\s]+$"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// How a value for the property is generated on insert. Only carried for the
/// write path; the read compiler never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Generation {
    #[default]
    None,
    AutoIncrement,
    Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Elementary,
    Complex,
}

impl EntityKind {
    pub fn of_type_name(type_name: &str) -> Self {
        if PRIMITIVE_TYPES.contains(&type_name) {
            EntityKind::Elementary
        } else {
            EntityKind::Complex
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub target_type: String,
    pub cardinality: Cardinality,
    pub optional: bool,
    /// Prefixed name of the edge in the store (`disco:content`)
    pub predicate: String,
    /// Set when the property has no direct representation; names the property on
    /// the target type whose edge points back at this entity.
    pub inverse_of: Option<String>,
    /// Set when this elementary property is a denormalized copy of the `Id` of the
    /// entity reached through the named complex property.
    pub foreign_key_of: Option<String>,
    pub generation: Generation,
}

impl Property {
    pub fn new(
        name: impl Into<String>,
        target_type: impl Into<String>,
        predicate: impl Into<String>,
    ) -> Self {
        Property {
            name: name.into(),
            target_type: target_type.into(),
            cardinality: Cardinality::One,
            optional: false,
            predicate: predicate.into(),
            inverse_of: None,
            foreign_key_of: None,
            generation: Generation::None,
        }
    }

    pub fn many(mut self) -> Self {
        self.cardinality = Cardinality::Many;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn inverse_of(mut self, property: impl Into<String>) -> Self {
        self.inverse_of = Some(property.into());
        self
    }

    pub fn foreign_key_of(mut self, property: impl Into<String>) -> Self {
        self.foreign_key_of = Some(property.into());
        self
    }

    pub fn generated(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    pub fn entity_kind(&self) -> EntityKind {
        EntityKind::of_type_name(&self.target_type)
    }

    pub fn is_elementary(&self) -> bool {
        self.entity_kind() == EntityKind::Elementary
    }

    pub fn is_id(&self) -> bool {
        self.name == ID_PROPERTY
    }

    /// `true` if the property yields at most one value per entity.
    pub fn is_cardinality_one(&self) -> bool {
        self.is_elementary() || self.cardinality == Cardinality::One
    }

    pub fn has_direct_representation(&self) -> bool {
        self.inverse_of.is_none()
    }

    pub fn is_mandatory(&self) -> bool {
        !self.optional
    }
}

#[derive(Debug, Clone)]
pub struct EntityType {
    pub name: String,
    /// Prefixed name of the RDF class instances carry, if any
    pub class: Option<String>,
    properties: Vec<Property>,
    index: HashMap<String, usize>,
}

impl EntityType {
    pub fn new(
        name: impl Into<String>,
        class: Option<String>,
        properties: Vec<Property>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut index = HashMap::new();
        for (position, property) in properties.iter().enumerate() {
            if index.insert(property.name.clone(), position).is_some() {
                return Err(SchemaError::invalid_schema_for(
                    &name,
                    format!("duplicate property `{}`", property.name),
                ));
            }
        }
        Ok(EntityType {
            name,
            class,
            properties,
            index,
        })
    }

    fn primitive(name: &str) -> Self {
        EntityType {
            name: name.to_string(),
            class: None,
            properties: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn is_elementary(&self) -> bool {
        EntityKind::of_type_name(&self.name) == EntityKind::Elementary
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|&position| &self.properties[position])
    }

    pub fn property(&self, name: &str) -> Result<&Property, SchemaError> {
        self.find_property(name).ok_or_else(|| SchemaError::Property {
            type_name: self.name.clone(),
            property: name.to_string(),
        })
    }

    pub fn id_property(&self) -> Result<&Property, SchemaError> {
        self.property(ID_PROPERTY)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Static description of all entity types, their properties and the entity sets
/// exposed to clients. Pure lookup; built once and shared read-only.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity_types: HashMap<String, EntityType>,
    entity_sets: HashMap<String, String>,
    /// (prefix, namespace IRI) in declaration order
    prefixes: Vec<(String, String)>,
}

impl EntitySchema {
    /// Build a schema and check the data model invariants.
    ///
    /// Primitive types are registered automatically and the `rdf` prefix is added
    /// when the caller did not declare it.
    pub fn new(
        prefixes: Vec<(String, String)>,
        entity_types: Vec<EntityType>,
        entity_sets: HashMap<String, String>,
    ) -> Result<Self, SchemaError> {
        let mut types = HashMap::new();
        for primitive in PRIMITIVE_TYPES {
            types.insert(primitive.to_string(), EntityType::primitive(primitive));
        }
        for entity_type in entity_types {
            if entity_type.is_elementary() {
                return Err(SchemaError::invalid_schema_for(
                    &entity_type.name,
                    "name collides with a primitive type",
                ));
            }
            let name = entity_type.name.clone();
            if types.insert(name.clone(), entity_type).is_some() {
                return Err(SchemaError::invalid_schema_for(&name, "declared twice"));
            }
        }

        let mut prefixes = prefixes;
        if !prefixes.iter().any(|(prefix, _)| prefix == "rdf") {
            prefixes.push(("rdf".to_string(), RDF_NAMESPACE.to_string()));
        }

        let schema = EntitySchema {
            entity_types: types,
            entity_sets,
            prefixes,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    pub fn entity_type(&self, name: &str) -> Result<&EntityType, SchemaError> {
        self.entity_types
            .get(name)
            .ok_or_else(|| SchemaError::EntityType {
                type_name: name.to_string(),
            })
    }

    /// Resolve an entity set name to the entity type it exposes.
    pub fn entity_set(&self, set_name: &str) -> Result<&EntityType, SchemaError> {
        let type_name = self
            .entity_sets
            .get(set_name)
            .ok_or_else(|| SchemaError::EntitySet {
                set_name: set_name.to_string(),
            })?;
        self.entity_type(type_name)
    }

    pub fn entity_set_names(&self) -> impl Iterator<Item = &str> {
        self.entity_sets.keys().map(|name| name.as_str())
    }

    pub fn target_type(&self, property: &Property) -> Result<&EntityType, SchemaError> {
        self.entity_type(&property.target_type)
    }

    /// The property on the target type whose edge represents `property` when it
    /// has no direct representation.
    pub fn inverse_property(&self, property: &Property) -> Result<&Property, SchemaError> {
        let inverse_name = property.inverse_of.as_deref().ok_or_else(|| {
            SchemaError::InvalidSchema {
                message: format!("property `{}` has a direct representation", property.name),
            }
        })?;
        self.target_type(property)?.property(inverse_name)
    }

    /// The store edge for a complex property: its own predicate, or the inverse
    /// property's predicate traversed backwards. Returns `(predicate, inverse)`.
    pub fn edge(&self, property: &Property) -> Result<(String, bool), SchemaError> {
        if property.has_direct_representation() {
            Ok((property.predicate.clone(), false))
        } else {
            Ok((self.inverse_property(property)?.predicate.clone(), true))
        }
    }

    /// Resolve a foreign-key copy to its two-hop path `[related, related.target.Id]`.
    ///
    /// Returns `None` for properties that are not foreign keys, so callers can
    /// treat `PostContentId` transparently as `Content/Id`.
    pub fn resolve_foreign_key<'s>(
        &'s self,
        owner: &'s EntityType,
        property: &Property,
    ) -> Result<Option<[&'s Property; 2]>, SchemaError> {
        let Some(related_name) = property.foreign_key_of.as_deref() else {
            return Ok(None);
        };
        let related = owner.property(related_name)?;
        let related_id = self.target_type(related)?.id_property()?;
        Ok(Some([related, related_id]))
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for (prefix, namespace) in &self.prefixes {
            if !NAMESPACE_IRI.is_match(namespace) {
                return Err(SchemaError::InvalidSchema {
                    message: format!("prefix `{}` has an invalid namespace IRI", prefix),
                });
            }
        }

        for (set_name, type_name) in &self.entity_sets {
            let entity_type = self.entity_type(type_name)?;
            if entity_type.is_elementary() {
                return Err(SchemaError::InvalidSchema {
                    message: format!("entity set `{}` exposes a primitive type", set_name),
                });
            }
        }

        for entity_type in self.entity_types.values() {
            if entity_type.is_elementary() {
                continue;
            }
            self.validate_entity_type(entity_type)?;
        }
        Ok(())
    }

    fn validate_entity_type(&self, entity_type: &EntityType) -> Result<(), SchemaError> {
        let id = entity_type.id_property().map_err(|_| {
            SchemaError::invalid_schema_for(&entity_type.name, "missing `Id` property")
        })?;
        if !id.is_elementary() || !id.is_mandatory() {
            return Err(SchemaError::invalid_schema_for(
                &entity_type.name,
                "`Id` must be a mandatory elementary property",
            ));
        }
        if let Some(class) = &entity_type.class {
            self.check_prefixed_name(&entity_type.name, class)?;
        }

        for property in entity_type.properties() {
            self.entity_type(&property.target_type)?;
            self.check_prefixed_name(&entity_type.name, &property.predicate)?;

            if !property.has_direct_representation() {
                self.validate_inverse(entity_type, property)?;
            }
            if property.foreign_key_of.is_some() {
                self.validate_foreign_key(entity_type, property)?;
            }
        }
        Ok(())
    }

    fn validate_inverse(
        &self,
        entity_type: &EntityType,
        property: &Property,
    ) -> Result<(), SchemaError> {
        if property.is_elementary() {
            return Err(SchemaError::invalid_schema_for(
                &entity_type.name,
                format!("elementary property `{}` cannot be inverse", property.name),
            ));
        }
        let inverse = self.inverse_property(property)?;
        if inverse.target_type != entity_type.name || !inverse.has_direct_representation() {
            return Err(SchemaError::invalid_schema_for(
                &entity_type.name,
                format!(
                    "inverse of `{}` must be a direct property pointing back to `{}`",
                    property.name, entity_type.name
                ),
            ));
        }
        Ok(())
    }

    fn validate_foreign_key(
        &self,
        entity_type: &EntityType,
        property: &Property,
    ) -> Result<(), SchemaError> {
        if !property.is_elementary() {
            return Err(SchemaError::invalid_schema_for(
                &entity_type.name,
                format!("foreign key `{}` must be elementary", property.name),
            ));
        }
        let related_name = property.foreign_key_of.as_deref().unwrap_or_default();
        let related = entity_type.property(related_name)?;
        if related.is_elementary() || !related.is_cardinality_one() {
            return Err(SchemaError::invalid_schema_for(
                &entity_type.name,
                format!(
                    "foreign key `{}` must copy the id of a single-valued navigation property",
                    property.name
                ),
            ));
        }
        self.target_type(related)?.id_property().map_err(|_| {
            SchemaError::invalid_schema_for(
                &entity_type.name,
                format!("target of `{}` exposes no `Id`", related.name),
            )
        })?;
        Ok(())
    }

    fn check_prefixed_name(&self, type_name: &str, name: &str) -> Result<(), SchemaError> {
        let captures = PREFIXED_NAME.captures(name).ok_or_else(|| {
            SchemaError::invalid_schema_for(type_name, format!("`{}` is not a prefixed name", name))
        })?;
        let prefix = &captures[1];
        if !self.prefixes.iter().any(|(declared, _)| declared == prefix) {
            return Err(SchemaError::invalid_schema_for(
                type_name,
                format!("prefix `{}` of `{}` is not declared", prefix, name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_schema() -> EntitySchema {
        let post = EntityType::new(
            "Post",
            Some("disco:Post".to_string()),
            vec![
                Property::new("Id", "Edm.Int32", "disco:id"),
                Property::new("ParentId", "Edm.Int32", "disco:parentId")
                    .optional()
                    .foreign_key_of("Parent"),
                Property::new("Parent", "Post", "disco:parent").optional(),
                Property::new("Children", "Post", "disco:children")
                    .many()
                    .optional()
                    .inverse_of("Parent"),
            ],
        )
        .unwrap();
        EntitySchema::new(
            vec![(
                "disco".to_string(),
                "http://disco-network.org/resource/".to_string(),
            )],
            vec![post],
            HashMap::from([("Posts".to_string(), "Post".to_string())]),
        )
        .unwrap()
    }

    #[test]
    fn test_property_lookup_and_kinds() {
        let schema = post_schema();
        let post = schema.entity_set("Posts").unwrap();
        assert_eq!(post.name, "Post");

        let id = post.property("Id").unwrap();
        assert_eq!(id.entity_kind(), EntityKind::Elementary);
        assert!(id.is_cardinality_one());

        let children = post.property("Children").unwrap();
        assert_eq!(children.entity_kind(), EntityKind::Complex);
        assert!(!children.is_cardinality_one());
        assert!(!children.has_direct_representation());

        assert_eq!(
            post.property("Missing"),
            Err(SchemaError::Property {
                type_name: "Post".to_string(),
                property: "Missing".to_string()
            })
        );
    }

    #[test]
    fn test_inverse_edge_uses_inverse_predicate() {
        let schema = post_schema();
        let post = schema.entity_type("Post").unwrap();
        let children = post.property("Children").unwrap();
        assert_eq!(
            schema.edge(children).unwrap(),
            ("disco:parent".to_string(), true)
        );
        let parent = post.property("Parent").unwrap();
        assert_eq!(
            schema.edge(parent).unwrap(),
            ("disco:parent".to_string(), false)
        );
    }

    #[test]
    fn test_foreign_key_resolves_to_two_hops() {
        let schema = post_schema();
        let post = schema.entity_type("Post").unwrap();
        let parent_id = post.property("ParentId").unwrap();
        let [related, related_id] = schema.resolve_foreign_key(post, parent_id).unwrap().unwrap();
        assert_eq!(related.name, "Parent");
        assert_eq!(related_id.name, "Id");

        let id = post.property("Id").unwrap();
        assert!(schema.resolve_foreign_key(post, id).unwrap().is_none());
    }

    #[test]
    fn test_rdf_prefix_is_always_declared() {
        let schema = post_schema();
        assert!(schema
            .prefixes()
            .iter()
            .any(|(prefix, namespace)| prefix == "rdf" && namespace == RDF_NAMESPACE));
    }

    #[test]
    fn test_inverse_must_point_back() {
        let tag = EntityType::new(
            "Tag",
            None,
            vec![
                Property::new("Id", "Edm.Int32", "disco:id"),
                Property::new("Posts", "Post", "disco:posts")
                    .many()
                    .inverse_of("Id"),
            ],
        )
        .unwrap();
        let post = EntityType::new(
            "Post",
            None,
            vec![Property::new("Id", "Edm.Int32", "disco:id")],
        )
        .unwrap();
        let result = EntitySchema::new(
            vec![("disco".to_string(), "http://example.org/".to_string())],
            vec![tag, post],
            HashMap::new(),
        );
        assert!(matches!(result, Err(SchemaError::InvalidSchema { .. })));
    }

    #[test]
    fn test_undeclared_prefix_rejected() {
        let post = EntityType::new(
            "Post",
            None,
            vec![Property::new("Id", "Edm.Int32", "ex:id")],
        )
        .unwrap();
        let result = EntitySchema::new(Vec::new(), vec![post], HashMap::new());
        assert!(matches!(result, Err(SchemaError::InvalidSchema { .. })));
    }

    #[test]
    fn test_predicate_injection_rejected() {
        let post = EntityType::new(
            "Post",
            None,
            vec![Property::new("Id", "Edm.Int32", "disco:id } DROP ALL {")],
        )
        .unwrap();
        let result = EntitySchema::new(
            vec![("disco".to_string(), "http://example.org/".to_string())],
            vec![post],
            HashMap::new(),
        );
        assert!(matches!(result, Err(SchemaError::InvalidSchema { .. })));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let result = EntityType::new(
            "Post",
            None,
            vec![
                Property::new("Id", "Edm.Int32", "disco:id"),
                Property::new("Id", "Edm.Int32", "disco:id"),
            ],
        );
        assert!(result.is_err());
    }
}
