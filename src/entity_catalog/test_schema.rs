//! Blog schema shared by the inline tests of the compiler stages.

use super::{EntitySchema, SchemaConfig};

pub(crate) const BLOG_SCHEMA_YAML: &str = r#"
prefixes:
  disco: "http://disco-network.org/resource/"
default_prefix: disco
entity_types:
  - name: Post
    class: disco:Post
    properties:
      - name: Id
        type: Edm.Int32
      - name: ContentId
        type: Edm.Int32
        foreign_key_of: Content
      - name: Content
        type: Content
      - name: ParentId
        type: Edm.Int32
        optional: true
        foreign_key_of: Parent
      - name: Parent
        type: Post
        optional: true
      - name: Children
        type: Post
        cardinality: many
        optional: true
        inverse_of: Parent
  - name: Content
    class: disco:Content
    properties:
      - name: Id
        type: Edm.Int32
      - name: Title
        type: Edm.String
      - name: Text
        type: Edm.String
        optional: true
entity_sets:
  Posts: Post
  Contents: Content
"#;

pub(crate) fn blog_schema() -> EntitySchema {
    SchemaConfig::from_yaml_str(BLOG_SCHEMA_YAML)
        .and_then(|config| config.to_entity_schema())
        .unwrap()
}
