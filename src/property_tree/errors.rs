use thiserror::Error;

use crate::variable_mapping::ScopeError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    /// An unimplemented property shape reached the traversal.
    #[error("No branch factory applies to {args}")]
    NoFactoryApplies { args: String },

    #[error(transparent)]
    Scope(#[from] ScopeError),
}
