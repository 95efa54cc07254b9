//! # Query Engine
//!
//! Entry point for reads: a [`ReadRequest`] names an entity set plus optional
//! expansion, filter and id. [`QueryEngine::compile`] runs the expand and filter
//! compilers over one shared [`MappingArena`](crate::variable_mapping::MappingArena)
//! and renders a single `SELECT *` query; [`QueryEngine::execute`] sends it to a
//! [`TripleStore`](crate::store::TripleStore) and decodes the rows.
//!
//! ```text
//! ReadRequest ──► ExpandTreeCompiler ──► TreeGraphPattern ─┐
//!             └─► FilterCompiler ──► clause + PropertyTree ─┴► SelectQuery ──► store ──► ResultDecoder
//! ```

pub mod engine;
pub mod errors;
pub mod request;

pub use engine::{compile_read_request, execute_read_request, CompiledQuery, QueryEngine};
pub use errors::{ErrorCategory, QueryError};
pub use request::ReadRequest;
