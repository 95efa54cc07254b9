use super::entity_schema::{Cardinality, EntitySchema, EntityType, Generation, Property};
use super::errors::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Entity schemas are defined in YAML with the following structure:
///
/// ```yaml
/// prefixes:                       # Namespace prefixes for the PREFIX header
///   disco: "http://disco-network.org/resource/"
/// default_prefix: disco           # Prefix used for predicates left implicit
/// entity_types:
///   - name: Post
///     class: disco:Post           # Optional rdf:type of every Post
///     properties:
///       - name: Id
///         type: Edm.Int32
///         generation: auto-increment
///       - name: ContentId
///         type: Edm.Int32
///         foreign_key_of: Content  # Denormalized copy of Content/Id
///       - name: Content
///         type: Content
///       - name: Children
///         type: Post
///         cardinality: many
///         optional: true
///         inverse_of: Parent       # No direct edge; read through Parent backwards
/// entity_sets:
///   Posts: Post
/// ```
///
/// When `predicate` is omitted, the property is stored under
/// `<default_prefix>:<name with a lower-case first letter>` (`Content` → `disco:content`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    pub default_prefix: String,
    pub entity_types: Vec<EntityTypeDefinition>,
    #[serde(default)]
    pub entity_sets: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub class: Option<String>,
    pub properties: Vec<PropertyDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub inverse_of: Option<String>,
    #[serde(default)]
    pub foreign_key_of: Option<String>,
    #[serde(default)]
    pub generation: Generation,
}

/// `Content` → `content`, `PostContentId` → `postContentId`
fn lower_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl SchemaConfig {
    /// Load a schema configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|e| SchemaError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a schema configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Structural checks that do not need the assembled schema
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.entity_types.is_empty() {
            return Err(SchemaError::InvalidSchema {
                message: "Schema must contain at least one entity type".to_string(),
            });
        }
        if !self.prefixes.contains_key(&self.default_prefix) {
            return Err(SchemaError::InvalidSchema {
                message: format!("default prefix `{}` is not declared", self.default_prefix),
            });
        }
        for definition in &self.entity_types {
            if definition.properties.is_empty() {
                return Err(SchemaError::invalid_schema_for(
                    &definition.name,
                    "no properties declared",
                ));
            }
            for property in &definition.properties {
                if property.inverse_of.is_some() && property.predicate.is_some() {
                    return Err(SchemaError::invalid_schema_for(
                        &definition.name,
                        format!(
                            "`{}` is read through its inverse and cannot declare a predicate",
                            property.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Assemble the validated [`EntitySchema`]
    pub fn to_entity_schema(&self) -> Result<EntitySchema, SchemaError> {
        self.validate()?;

        let mut entity_types = Vec::with_capacity(self.entity_types.len());
        for definition in &self.entity_types {
            let properties = definition
                .properties
                .iter()
                .map(|property| self.build_property(property))
                .collect();
            entity_types.push(EntityType::new(
                definition.name.clone(),
                definition.class.clone(),
                properties,
            )?);
        }

        let prefixes = self
            .prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.clone(), namespace.clone()))
            .collect();

        let schema = EntitySchema::new(prefixes, entity_types, self.entity_sets.clone())?;
        log::info!(
            "Loaded entity schema: {} entity types, {} entity sets",
            self.entity_types.len(),
            self.entity_sets.len()
        );
        Ok(schema)
    }

    fn build_property(&self, definition: &PropertyDefinition) -> Property {
        let predicate = definition.predicate.clone().unwrap_or_else(|| {
            format!(
                "{}:{}",
                self.default_prefix,
                lower_camel_case(&definition.name)
            )
        });
        let mut property = Property::new(&definition.name, &definition.type_name, predicate)
            .generated(definition.generation);
        property.cardinality = definition.cardinality;
        property.optional = definition.optional;
        property.inverse_of = definition.inverse_of.clone();
        property.foreign_key_of = definition.foreign_key_of.clone();
        property
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_catalog::entity_schema::EntityKind;
    use std::io::Write;

    const SCHEMA_YAML: &str = r#"
prefixes:
  disco: "http://disco-network.org/resource/"
default_prefix: disco
entity_types:
  - name: Post
    class: disco:Post
    properties:
      - name: Id
        type: Edm.Int32
        generation: auto-increment
      - name: ContentId
        type: Edm.Int32
        foreign_key_of: Content
      - name: Content
        type: Content
      - name: Children
        type: Post
        cardinality: many
        optional: true
        inverse_of: Parent
      - name: Parent
        type: Post
        optional: true
  - name: Content
    properties:
      - name: Id
        type: Edm.Int32
      - name: Title
        type: Edm.String
        predicate: disco:headline
entity_sets:
  Posts: Post
"#;

    #[test]
    fn test_yaml_schema_loading() {
        let config = SchemaConfig::from_yaml_str(SCHEMA_YAML).unwrap();
        let schema = config.to_entity_schema().unwrap();

        let post = schema.entity_set("Posts").unwrap();
        assert_eq!(post.class.as_deref(), Some("disco:Post"));
        let names: Vec<&str> = post.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "ContentId", "Content", "Children", "Parent"]);

        let content = post.property("Content").unwrap();
        assert_eq!(content.predicate, "disco:content");
        assert_eq!(content.entity_kind(), EntityKind::Complex);

        let id = post.property("Id").unwrap();
        assert_eq!(id.generation, Generation::AutoIncrement);

        let title = schema
            .entity_type("Content")
            .unwrap()
            .property("Title")
            .unwrap();
        assert_eq!(title.predicate, "disco:headline");
    }

    #[test]
    fn test_yaml_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA_YAML.as_bytes()).unwrap();
        let config = SchemaConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.entity_types.len(), 2);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = SchemaConfig::from_yaml_file("/nonexistent/schema.yaml");
        assert!(matches!(result, Err(SchemaError::ConfigReadError { .. })));
    }

    #[test]
    fn test_undeclared_default_prefix() {
        let yaml = SCHEMA_YAML.replace("default_prefix: disco", "default_prefix: ex");
        let config = SchemaConfig::from_yaml_str(&yaml).unwrap();
        assert!(matches!(
            config.to_entity_schema(),
            Err(SchemaError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let result = SchemaConfig::from_yaml_str("entity_types: [");
        assert!(matches!(result, Err(SchemaError::ConfigParseError { .. })));
    }

    #[test]
    fn test_lower_camel_case() {
        assert_eq!(lower_camel_case("Content"), "content");
        assert_eq!(lower_camel_case("PostContentId"), "postContentId");
        assert_eq!(lower_camel_case(""), "");
    }
}
