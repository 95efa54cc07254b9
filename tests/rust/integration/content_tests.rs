use serde_json::json;

use odata_sparql::expand_compiler::ExpandTree;
use odata_sparql::filter_compiler::FilterExpr;
use odata_sparql::query_engine::{ErrorCategory, QueryEngine, ReadRequest};

use super::blog_store::{schema_from, store};

const CONTENT_SCHEMA_YAML: &str = r#"
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

const CONTENT_TURTLE: &str = r#"
@prefix disco: <http://disco-network.org/resource/> .

disco:post1 a disco:Post ; disco:id 1 ; disco:content disco:content10 .
disco:post2 a disco:Post ; disco:id 2 ; disco:content disco:content20 .
disco:content10 a disco:Content ; disco:id 10 ; disco:title "Hello" ; disco:text "It's me" .
disco:content20 a disco:Content ; disco:id 20 ; disco:title "World" .
"#;

#[tokio::test]
async fn test_filter_through_navigation_with_expand() {
    let schema = schema_from(CONTENT_SCHEMA_YAML);
    let engine = QueryEngine::new(&schema);
    let request = ReadRequest::collection("Posts")
        .with_expand(ExpandTree::parse(["Content"]))
        .with_filter(FilterExpr::eq(
            FilterExpr::property(&["Content", "Title"]),
            FilterExpr::string("Hello"),
        ));

    let result = engine.execute(&store(CONTENT_TURTLE), &request).await.unwrap();
    assert_eq!(
        result,
        json!([{
            "Id": "1",
            "ContentId": "10",
            "Content": {"Id": "10", "Title": "Hello", "Text": "It's me"}
        }])
    );
}

#[tokio::test]
async fn test_optional_elementary_is_null_when_missing() {
    let schema = schema_from(CONTENT_SCHEMA_YAML);
    let engine = QueryEngine::new(&schema);
    let request = ReadRequest::by_id("Contents", FilterExpr::number(20.0));

    let result = engine.execute(&store(CONTENT_TURTLE), &request).await.unwrap();
    assert_eq!(result, json!({"Id": "20", "Title": "World", "Text": null}));
}

#[tokio::test]
async fn test_string_literal_is_escaped() {
    let schema = schema_from(CONTENT_SCHEMA_YAML);
    let engine = QueryEngine::new(&schema);
    let request = ReadRequest::collection("Contents").with_filter(FilterExpr::eq(
        FilterExpr::property(&["Text"]),
        FilterExpr::string("It's me"),
    ));

    let result = engine.execute(&store(CONTENT_TURTLE), &request).await.unwrap();
    assert_eq!(result[0]["Id"], json!("10"));
    assert_eq!(result.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_filter_on_elementary_segment_is_rejected() {
    let schema = schema_from(CONTENT_SCHEMA_YAML);
    let engine = QueryEngine::new(&schema);
    let request = ReadRequest::collection("Posts").with_filter(FilterExpr::eq(
        FilterExpr::property(&["ContentId", "Title"]),
        FilterExpr::string("Hello"),
    ));

    let err = engine.compile(&request).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::BadRequest);
}
