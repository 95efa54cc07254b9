//! Triple-store drivers
//!
//! The compiler produces one SELECT query per read request; a [`TripleStore`]
//! runs it and returns the variable bindings of every solution row.
//!
//! - [`HttpSparqlStore`]: any SPARQL 1.1 protocol endpoint, results in the W3C
//!   JSON format
//! - [`EmbeddedStore`] (feature `embedded`): an in-memory store loaded from Turtle

pub mod bindings;
#[cfg(feature = "embedded")]
pub mod embedded;
pub mod errors;
pub mod http;

use async_trait::async_trait;

pub use bindings::{binding_row, parse_results_json, BindingRow, BindingValue};
#[cfg(feature = "embedded")]
pub use embedded::EmbeddedStore;
pub use errors::StoreError;
pub use http::HttpSparqlStore;

#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Run a SELECT query and return its solution rows.
    async fn select(&self, query: &str) -> Result<Vec<BindingRow>, StoreError>;
}
