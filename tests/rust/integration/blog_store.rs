use odata_sparql::entity_catalog::{EntitySchema, SchemaConfig};
use odata_sparql::store::EmbeddedStore;

pub const POST_SCHEMA_YAML: &str = r#"
prefixes:
  disco: "http://disco-network.org/resource/"
default_prefix: disco
entity_types:
  - name: Post
    class: disco:Post
    properties:
      - name: Id
        type: Edm.Int32
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
entity_sets:
  Posts: Post
"#;

/// Post 1 has children 2 and 3; post 4 stands alone.
pub const POSTS_TURTLE: &str = r#"
@prefix disco: <http://disco-network.org/resource/> .

disco:post1 a disco:Post ; disco:id 1 .
disco:post2 a disco:Post ; disco:id 2 ; disco:parent disco:post1 .
disco:post3 a disco:Post ; disco:id 3 ; disco:parent disco:post1 .
disco:post4 a disco:Post ; disco:id 4 .
"#;

pub fn schema_from(yaml: &str) -> EntitySchema {
    SchemaConfig::from_yaml_str(yaml)
        .and_then(|config| config.to_entity_schema())
        .unwrap()
}

pub fn post_schema() -> EntitySchema {
    schema_from(POST_SCHEMA_YAML)
}

pub fn store(turtle: &str) -> EmbeddedStore {
    EmbeddedStore::from_turtle(turtle).unwrap()
}
