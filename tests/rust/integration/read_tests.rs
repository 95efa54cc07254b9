use serde_json::{json, Value};

use odata_sparql::expand_compiler::ExpandTree;
use odata_sparql::filter_compiler::FilterExpr;
use odata_sparql::query_engine::{execute_read_request, ErrorCategory, QueryError, ReadRequest};

use super::blog_store::{post_schema, store, POSTS_TURTLE};

async fn read(request: ReadRequest) -> Result<Value, QueryError> {
    read_from(POSTS_TURTLE, request).await
}

async fn read_from(turtle: &str, request: ReadRequest) -> Result<Value, QueryError> {
    let schema = post_schema();
    let store = store(turtle);
    execute_read_request(&store, &schema, &request).await
}

fn ids(result: &Value) -> Vec<&str> {
    let mut ids: Vec<&str> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|entity| entity["Id"].as_str().unwrap())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_plain_collection() {
    let result = read(ReadRequest::collection("Posts")).await.unwrap();
    assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn test_any_over_children() {
    let filter = FilterExpr::any(
        &["Children"],
        "it",
        FilterExpr::eq(FilterExpr::property(&["it", "Id"]), FilterExpr::number(2.0)),
    );
    let result = read(ReadRequest::collection("Posts").with_filter(filter))
        .await
        .unwrap();
    assert_eq!(result, json!([{"Id": "1", "ParentId": null}]));
}

#[tokio::test]
async fn test_any_without_match_is_empty() {
    let filter = FilterExpr::any(
        &["Children"],
        "it",
        FilterExpr::eq(FilterExpr::property(&["it", "Id"]), FilterExpr::number(4.0)),
    );
    let result = read(ReadRequest::collection("Posts").with_filter(filter))
        .await
        .unwrap();
    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_eq_null_matches_unset_foreign_key() {
    let filter = FilterExpr::eq(FilterExpr::property(&["ParentId"]), FilterExpr::null());
    let result = read(ReadRequest::collection("Posts").with_filter(filter))
        .await
        .unwrap();
    assert_eq!(ids(&result), vec!["1", "4"]);
}

#[tokio::test]
async fn test_eq_foreign_key_value() {
    let filter = FilterExpr::eq(FilterExpr::property(&["ParentId"]), FilterExpr::number(1.0));
    let result = read(ReadRequest::collection("Posts").with_filter(filter))
        .await
        .unwrap();
    assert_eq!(ids(&result), vec!["2", "3"]);
}

#[tokio::test]
async fn test_or_of_id_filters() {
    let filter = FilterExpr::or(
        FilterExpr::eq(FilterExpr::property(&["Id"]), FilterExpr::number(2.0)),
        FilterExpr::eq(FilterExpr::property(&["Id"]), FilterExpr::number(4.0)),
    );
    let result = read(ReadRequest::collection("Posts").with_filter(filter))
        .await
        .unwrap();
    assert_eq!(ids(&result), vec!["2", "4"]);
}

#[tokio::test]
async fn test_optional_property_comparison_matches_when_both_unset() {
    let filter = FilterExpr::eq(
        FilterExpr::property(&["ParentId"]),
        FilterExpr::property(&["Parent", "ParentId"]),
    );
    let result = read(ReadRequest::collection("Posts").with_filter(filter))
        .await
        .unwrap();
    assert_eq!(ids(&result), vec!["1", "4"]);
}

#[tokio::test]
async fn test_collection_keeps_entities_without_any_related_entity() {
    let request =
        ReadRequest::collection("Posts").with_expand(ExpandTree::parse(["Parent", "Children"]));
    let result = read(request).await.unwrap();
    assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);

    let post = |id: &str| {
        result
            .as_array()
            .unwrap()
            .iter()
            .find(|entity| entity["Id"] == id)
            .cloned()
            .unwrap()
    };
    assert_eq!(
        post("4"),
        json!({"Id": "4", "ParentId": null, "Parent": null, "Children": []})
    );
    assert_eq!(post("3")["Parent"], json!({"Id": "1", "ParentId": null}));
    assert_eq!(post("1")["Parent"], Value::Null);
    assert_eq!(post("1")["Children"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_by_id_with_expanded_children() {
    let request = ReadRequest::by_id("Posts", FilterExpr::number(1.0))
        .with_expand(ExpandTree::parse(["Children"]));
    let mut result = read(request).await.unwrap();

    let children = result["Children"].as_array_mut().unwrap();
    children.sort_by(|a, b| a["Id"].as_str().cmp(&b["Id"].as_str()));
    assert_eq!(
        result,
        json!({
            "Id": "1",
            "ParentId": null,
            "Children": [
                {"Id": "2", "ParentId": "1"},
                {"Id": "3", "ParentId": "1"}
            ]
        })
    );
}

#[tokio::test]
async fn test_expand_parent_and_leaf_without_children() {
    let request = ReadRequest::by_id("Posts", FilterExpr::number(2.0))
        .with_expand(ExpandTree::parse(["Parent", "Children"]));
    let result = read(request).await.unwrap();
    assert_eq!(
        result,
        json!({
            "Id": "2",
            "ParentId": "1",
            "Parent": {"Id": "1", "ParentId": null},
            "Children": []
        })
    );
}

#[tokio::test]
async fn test_nested_expand() {
    let request = ReadRequest::by_id("Posts", FilterExpr::number(2.0))
        .with_expand(ExpandTree::parse(["Parent/Children"]));
    let mut result = read(request).await.unwrap();

    let siblings = result["Parent"]["Children"].as_array_mut().unwrap();
    siblings.sort_by(|a, b| a["Id"].as_str().cmp(&b["Id"].as_str()));
    assert_eq!(
        result["Parent"]["Children"],
        json!([{"Id": "2", "ParentId": "1"}, {"Id": "3", "ParentId": "1"}])
    );
}

#[tokio::test]
async fn test_by_id_missing_is_null() {
    let result = read(ReadRequest::by_id("Posts", FilterExpr::number(99.0)))
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn test_two_parents_are_inconsistent() {
    let turtle = r#"
        @prefix disco: <http://disco-network.org/resource/> .
        disco:post1 a disco:Post ; disco:id 1 .
        disco:post2 a disco:Post ; disco:id 2 .
        disco:post3 a disco:Post ; disco:id 3 ; disco:parent disco:post1, disco:post2 .
    "#;
    let err = read_from(turtle, ReadRequest::by_id("Posts", FilterExpr::number(3.0)))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InconsistentData);
}
