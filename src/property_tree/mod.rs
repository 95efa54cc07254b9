//! Property Tree / Branching Model
//!
//! A [`PropertyTree`] is the schema-shaped intermediate form of a query: each node
//! (branch) carries [`BranchingArgs`] saying *which* property or variable it stands
//! for. Re-inserting equal args under the same parent returns the existing node,
//! so independent requests touching the same property collapse into one edge.
//!
//! *How* a branch is rendered into the graph pattern is decided by an ordered
//! registry of [`BranchFactory`] rules: the first rule whose predicate accepts the
//! args places the branch and moves the traversal position into the sub-pattern
//! it created.

pub mod branch_factory;
pub mod branching_args;
pub mod errors;
pub mod placement;
pub mod tree;

pub use branch_factory::{BranchFactories, BranchFactory, Placement, Position};
pub use branching_args::{AnyArgs, BranchingArgs, MirroredFrom, PropertyArgs};
pub use errors::TreeError;
pub use tree::{NodeId, PropertyTree};
