use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::always;
use serde_json::json;

use odata_sparql::entity_catalog::{EntitySchema, SchemaConfig};
use odata_sparql::expand_compiler::ExpandTree;
use odata_sparql::filter_compiler::FilterExpr;
use odata_sparql::query_engine::{
    compile_read_request, execute_read_request, ErrorCategory, ReadRequest,
};
use odata_sparql::store::{binding_row, BindingRow, StoreError, TripleStore};

mock! {
    pub Store {}

    #[async_trait]
    impl TripleStore for Store {
        async fn select(&self, query: &str) -> Result<Vec<BindingRow>, StoreError>;
    }
}

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

fn schema() -> EntitySchema {
    SchemaConfig::from_yaml_str(SCHEMA_YAML)
        .and_then(|config| config.to_entity_schema())
        .unwrap()
}

#[test]
fn test_by_id_read_sends_filtered_query() {
    let schema = schema();
    let mut store = MockStore::new();
    store
        .expect_select()
        .withf(|query| query.contains("FILTER((?x1 = 1))"))
        .times(1)
        .returning(|_| {
            Ok(vec![binding_row([
                ("x0", "http://disco-network.org/resource/post1"),
                ("x1", "1"),
            ])])
        });

    let request = ReadRequest::by_id("Posts", FilterExpr::number(1.0));
    let result = tokio_test::block_on(execute_read_request(&store, &schema, &request)).unwrap();
    assert_eq!(result, json!({"Id": "1", "ParentId": null}));
}

#[test]
fn test_by_id_without_rows_is_null() {
    let schema = schema();
    let mut store = MockStore::new();
    store.expect_select().with(always()).returning(|_| Ok(Vec::new()));

    let request = ReadRequest::by_id("Posts", FilterExpr::number(9.0));
    let result = tokio_test::block_on(execute_read_request(&store, &schema, &request)).unwrap();
    assert!(result.is_null());
}

#[test]
fn test_expanded_collection_is_recombined() {
    let schema = schema();
    let compiled = compile_read_request(
        &schema,
        &ReadRequest::collection("Posts").with_expand(ExpandTree::parse(["Children"])),
    )
    .unwrap();

    let column = |path: &[&str]| {
        let (last, navigation) = path.split_last().unwrap();
        let mapping = navigation.iter().fold(compiled.root, |mapping, name| {
            compiled.arena.get_complex(mapping, name).unwrap()
        });
        compiled
            .arena
            .get_elementary(mapping, last)
            .unwrap()
            .trim_start_matches('?')
            .to_string()
    };
    let id = column(&["Id"]);
    let child_id = column(&["Children", "Id"]);
    let child_parent_id = column(&["Children", "ParentId"]);

    let mut store = MockStore::new();
    store.expect_select().returning(move |_| {
        Ok(vec![
            binding_row([(id.as_str(), "1")]),
            binding_row([
                (id.as_str(), "1"),
                (child_id.as_str(), "2"),
                (child_parent_id.as_str(), "1"),
            ]),
        ])
    });

    let request = ReadRequest::collection("Posts").with_expand(ExpandTree::parse(["Children"]));
    let result = tokio_test::block_on(execute_read_request(&store, &schema, &request)).unwrap();
    assert_eq!(
        result,
        json!([{
            "Id": "1",
            "ParentId": null,
            "Children": [{"Id": "2", "ParentId": "1"}]
        }])
    );
}

#[test]
fn test_store_failure_is_reported() {
    let schema = schema();
    let mut store = MockStore::new();
    store.expect_select().returning(|_| {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    });

    let err = tokio_test::block_on(execute_read_request(
        &store,
        &schema,
        &ReadRequest::collection("Posts"),
    ))
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Store);
}

#[test]
fn test_unknown_expand_is_a_bad_request_and_skips_the_store() {
    let schema = schema();
    let mut store = MockStore::new();
    store.expect_select().times(0);

    let request = ReadRequest::collection("Posts").with_expand(ExpandTree::parse(["Author"]));
    let err = tokio_test::block_on(execute_read_request(&store, &schema, &request)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::BadRequest);
}

#[test]
fn test_conflicting_rows_are_inconsistent_data() {
    let schema = schema();
    let compiled = compile_read_request(&schema, &ReadRequest::collection("Posts")).unwrap();
    let parent = compiled
        .arena
        .get_elementary(compiled.root, "ParentId")
        .unwrap()
        .trim_start_matches('?')
        .to_string();

    let mut store = MockStore::new();
    store.expect_select().returning(move |_| {
        Ok(vec![
            binding_row([("x1", "3"), (parent.as_str(), "1")]),
            binding_row([("x1", "3"), (parent.as_str(), "2")]),
        ])
    });

    let err = tokio_test::block_on(execute_read_request(
        &store,
        &schema,
        &ReadRequest::collection("Posts"),
    ))
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InconsistentData);
}
