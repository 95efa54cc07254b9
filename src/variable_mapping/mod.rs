//! Variable allocation for one compilation.
//!
//! A [`MappingArena`] owns every [`VariableMapping`] and [`ScopedMapping`] created
//! while compiling one query. Mappings mirror the schema-shaped property tree: an
//! elementary property maps to a variable, a complex property maps to a child
//! mapping. Scopes add isolated namespaces for the variables bound by `any`.
//!
//! All mappings of one arena draw from a single counter, so variable names never
//! collide across branches and the same visitation order always yields the same
//! names (`?x0`, `?x1`, ...). The arena is discarded with the compilation.

pub mod errors;
pub mod scoped_mapping;
pub mod variable_mapping;

pub use errors::ScopeError;
pub use scoped_mapping::{Namespace, ScopeId, ScopeKey, ScopedMapping};
pub use variable_mapping::{MappingArena, MappingId, VariableMapping};
