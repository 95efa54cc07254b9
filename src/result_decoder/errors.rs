use thiserror::Error;

use crate::entity_catalog::SchemaError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    /// The store returned two values where the schema declares at most one.
    #[error(
        "Inconsistent result for {entity_type} `{id}`: `{property}` is both `{first}` and `{second}`"
    )]
    InconsistentResult {
        entity_type: String,
        id: String,
        property: String,
        first: String,
        second: String,
    },

    /// The mapping handed to the decoder was not populated by the compiler.
    #[error("No variable allocated for `{entity_type}.{property}`")]
    MissingVariable {
        entity_type: String,
        property: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
