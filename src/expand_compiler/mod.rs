//! Expand-Tree Compiler
//!
//! Turns the requested navigation paths (`$expand=Children/Parent`) into the graph
//! pattern that reads one entity set:
//!
//! 1. **Property selection**: every elementary property of each visited entity
//!    type, plus the complex properties named in the matching [`ExpandTree`] node.
//! 2. **Placement**: the selection becomes a [`PropertyTree`] whose traversal
//!    renders it into a [`TreeGraphPattern`] rooted at the entity variable.
//!
//! The [`MappingArena`] populated on the way holds exactly the variables the
//! result decoder reads back.
//!
//! [`PropertyTree`]: crate::property_tree::PropertyTree
//! [`TreeGraphPattern`]: crate::graph_pattern::TreeGraphPattern
//! [`MappingArena`]: crate::variable_mapping::MappingArena

pub mod compiler;
pub mod errors;
pub mod expand_tree;

pub use compiler::ExpandTreeCompiler;
pub use errors::ExpandError;
pub use expand_tree::ExpandTree;
