use thiserror::Error;

use crate::entity_catalog::SchemaError;
use crate::property_tree::TreeError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExpandError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
