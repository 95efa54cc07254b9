use async_trait::async_trait;
use oxigraph::io::RdfFormat;
use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use super::bindings::{BindingRow, BindingValue};
use super::errors::StoreError;
use super::TripleStore;

/// In-memory triple store for local data files and tests.
#[derive(Clone)]
pub struct EmbeddedStore {
    store: Store,
}

impl EmbeddedStore {
    pub fn new() -> Result<Self, StoreError> {
        let store = Store::new().map_err(|e| StoreError::Load {
            message: e.to_string(),
        })?;
        Ok(EmbeddedStore { store })
    }

    pub fn from_turtle(turtle: &str) -> Result<Self, StoreError> {
        let store = Self::new()?;
        store.load_turtle(turtle)?;
        Ok(store)
    }

    pub fn load_turtle(&self, turtle: &str) -> Result<(), StoreError> {
        self.store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| StoreError::Load {
                message: e.to_string(),
            })
    }

    /// Number of triples loaded
    pub fn len(&self) -> Result<usize, StoreError> {
        self.store.len().map_err(|e| StoreError::Query {
            message: e.to_string(),
        })
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn binding_value(term: &Term) -> BindingValue {
    match term {
        Term::NamedNode(node) => BindingValue {
            value: node.as_str().to_string(),
            kind: Some("uri".to_string()),
            datatype: None,
            lang: None,
        },
        Term::BlankNode(node) => BindingValue {
            value: node.as_str().to_string(),
            kind: Some("bnode".to_string()),
            datatype: None,
            lang: None,
        },
        Term::Literal(literal) => BindingValue {
            value: literal.value().to_string(),
            kind: Some("literal".to_string()),
            datatype: Some(literal.datatype().as_str().to_string()),
            lang: literal.language().map(str::to_string),
        },
        #[allow(unreachable_patterns)]
        other => BindingValue {
            value: other.to_string(),
            kind: None,
            datatype: None,
            lang: None,
        },
    }
}

#[async_trait]
impl TripleStore for EmbeddedStore {
    async fn select(&self, query: &str) -> Result<Vec<BindingRow>, StoreError> {
        let results = self.store.query(query).map_err(|e| StoreError::Query {
            message: e.to_string(),
        })?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(StoreError::MalformedResponse {
                message: "expected SELECT solutions".to_string(),
            });
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| StoreError::Query {
                message: e.to_string(),
            })?;
            let row: BindingRow = solution
                .iter()
                .map(|(variable, term)| (variable.as_str().to_string(), binding_value(term)))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}
