//! Target-language graph patterns.
//!
//! [`TreeGraphPattern`] is the structural WHERE-clause fragment the property tree
//! is rendered into; [`SelectQuery`] wraps it into a complete SPARQL SELECT. Both
//! render through the [`ToSparql`] trait.

pub mod errors;
pub mod literal;
pub mod to_sparql;
pub mod tree_pattern;

pub use errors::PatternError;
pub use literal::{escape_literal, quote_literal};
pub use to_sparql::{SelectQuery, ToSparql};
pub use tree_pattern::{EdgeDirection, PatternBranch, TreeGraphPattern};
