use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::StoreError;

/// One bound term of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingValue {
    pub value: String,
    /// `uri`, `literal` or `bnode`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl BindingValue {
    pub fn literal(value: impl Into<String>) -> Self {
        BindingValue {
            value: value.into(),
            kind: Some("literal".to_string()),
            datatype: None,
            lang: None,
        }
    }
}

/// Variable name (without `?`) to bound value. Unbound variables are absent.
pub type BindingRow = HashMap<String, BindingValue>;

/// Build a row of plain literals, mostly for tests and fixtures.
pub fn binding_row<'a, I>(pairs: I) -> BindingRow
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(variable, value)| (variable.to_string(), BindingValue::literal(value)))
        .collect()
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: ResultBindings,
}

#[derive(Debug, Deserialize)]
struct ResultBindings {
    bindings: Vec<BindingRow>,
}

/// Parse a SPARQL 1.1 Query Results JSON document (SELECT form).
pub fn parse_results_json(body: &str) -> Result<Vec<BindingRow>, StoreError> {
    let parsed: SparqlResults =
        serde_json::from_str(body).map_err(|e| StoreError::MalformedResponse {
            message: e.to_string(),
        })?;
    Ok(parsed.results.bindings)
}
