//! odata-sparql - OData-style entity reads over RDF triple stores
//!
//! This crate compiles entity-set reads through:
//! - An entity schema that maps entity types and properties to RDF classes and predicates
//! - Expand trees that select navigation properties to inline
//! - Filter expressions, including `any` lambdas over collections
//! - A property tree that places every needed binding into one SPARQL graph pattern
//! - A decoder that folds the flat result rows back into nested JSON entities

pub mod config;
pub mod entity_catalog;
pub mod expand_compiler;
pub mod filter_compiler;
pub mod graph_pattern;
pub mod property_tree;
pub mod query_engine;
pub mod result_decoder;
pub mod store;
pub mod variable_mapping;
