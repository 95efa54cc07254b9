//! # Read Request Errors
//!
//! [`QueryError`] wraps the error of whichever stage failed so `?` can thread
//! failures through compile, execute and decode.
//!
//! ## Error Categories
//!
//! - **BadRequest**: the request does not fit the schema (unknown property,
//!   invalid path, malformed literal)
//! - **CompilerBug**: scope, pattern-merge or placement failures; the request was
//!   valid but the compiler produced an inconsistent intermediate form
//! - **Store**: the store round-trip failed or returned unreadable rows
//! - **InconsistentData**: the stored data violates a declared cardinality

use thiserror::Error;

use crate::entity_catalog::SchemaError;
use crate::expand_compiler::ExpandError;
use crate::filter_compiler::FilterCompileError;
use crate::graph_pattern::PatternError;
use crate::property_tree::TreeError;
use crate::result_decoder::DecodeError;
use crate::store::StoreError;
use crate::variable_mapping::ScopeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadRequest,
    CompilerBug,
    Store,
    InconsistentData,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Expand(#[from] ExpandError),

    #[error(transparent)]
    Filter(#[from] FilterCompileError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QueryError::Schema(_) => ErrorCategory::BadRequest,
            QueryError::Scope(_) | QueryError::Pattern(_) | QueryError::Tree(_) => {
                ErrorCategory::CompilerBug
            }
            QueryError::Expand(ExpandError::Schema(_)) => ErrorCategory::BadRequest,
            QueryError::Expand(ExpandError::Tree(_)) => ErrorCategory::CompilerBug,
            QueryError::Filter(FilterCompileError::Schema(_))
            | QueryError::Filter(FilterCompileError::InvalidLiteral { .. }) => {
                ErrorCategory::BadRequest
            }
            QueryError::Filter(FilterCompileError::Scope(_))
            | QueryError::Filter(FilterCompileError::Tree(_)) => ErrorCategory::CompilerBug,
            QueryError::Decode(DecodeError::InconsistentResult { .. }) => {
                ErrorCategory::InconsistentData
            }
            QueryError::Decode(DecodeError::MissingVariable { .. }) => ErrorCategory::CompilerBug,
            QueryError::Decode(DecodeError::Schema(_)) => ErrorCategory::BadRequest,
            QueryError::Store(_) => ErrorCategory::Store,
        }
    }
}
