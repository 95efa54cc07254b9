use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;

use super::bindings::{parse_results_json, BindingRow};
use super::errors::StoreError;
use super::TripleStore;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// SPARQL 1.1 protocol client: queries are POSTed as `query=` form data.
#[derive(Debug, Clone)]
pub struct HttpSparqlStore {
    client: Client,
    endpoint: String,
}

impl HttpSparqlStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Request {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(HttpSparqlStore {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TripleStore for HttpSparqlStore {
    async fn select(&self, query: &str) -> Result<Vec<BindingRow>, StoreError> {
        log::debug!("POST {} ({} bytes of SPARQL)", self.endpoint, query.len());
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| StoreError::Request {
            message: format!("failed to read response body: {}", e),
        })?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_results_json(&body)
    }
}
