use thiserror::Error;

use crate::entity_catalog::SchemaError;
use crate::property_tree::TreeError;
use crate::variable_mapping::ScopeError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterCompileError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Invalid literal `{value}`: {reason}")]
    InvalidLiteral { value: String, reason: String },
}
