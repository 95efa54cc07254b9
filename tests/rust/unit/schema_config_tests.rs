use odata_sparql::entity_catalog::{SchemaConfig, SchemaError};

const VALID: &str = r#"
prefixes:
  disco: "http://disco-network.org/resource/"
default_prefix: disco
entity_types:
  - name: Post
    class: disco:Post
    properties:
      - name: Id
        type: Edm.Int32
entity_sets:
  Posts: Post
"#;

#[test]
fn test_valid_schema_loads() {
    let schema = SchemaConfig::from_yaml_str(VALID)
        .and_then(|config| config.to_entity_schema())
        .unwrap();
    let post = schema.entity_set("Posts").unwrap();
    assert_eq!(post.name, "Post");
    assert!(schema.prefixes().iter().any(|(prefix, _)| prefix == "rdf"));
}

#[test]
fn test_unknown_entity_set() {
    let schema = SchemaConfig::from_yaml_str(VALID)
        .and_then(|config| config.to_entity_schema())
        .unwrap();
    assert!(matches!(
        schema.entity_set("Authors"),
        Err(SchemaError::EntitySet { .. })
    ));
}

#[test]
fn test_entity_type_without_id_is_rejected() {
    let yaml = VALID.replace("- name: Id", "- name: Title");
    let result = SchemaConfig::from_yaml_str(&yaml).and_then(|config| config.to_entity_schema());
    assert!(result.is_err());
}

#[test]
fn test_malformed_yaml_is_a_parse_error() {
    assert!(matches!(
        SchemaConfig::from_yaml_str("entity_types: [unclosed"),
        Err(SchemaError::ConfigParseError { .. })
    ));
}
