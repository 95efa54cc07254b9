use std::collections::HashMap;

use crate::graph_pattern::TreeGraphPattern;
use crate::variable_mapping::MappingArena;

use super::branch_factory::{BranchFactories, Position};
use super::branching_args::BranchingArgs;
use super::errors::TreeError;

/// Handle to a node of a [`PropertyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct TreeNode {
    /// `None` only for the root
    args: Option<BranchingArgs>,
    children: Vec<NodeId>,
    index: HashMap<BranchingArgs, NodeId>,
}

impl TreeNode {
    fn new(args: Option<BranchingArgs>) -> Self {
        TreeNode {
            args,
            children: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// Arena-backed tree of branch requests. Children keep insertion order, which
/// keeps variable allocation deterministic.
#[derive(Debug, Clone)]
pub struct PropertyTree {
    nodes: Vec<TreeNode>,
}

impl Default for PropertyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTree {
    pub fn new() -> Self {
        PropertyTree {
            nodes: vec![TreeNode::new(None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Child of `parent` for `args`, created unless an equal child already exists.
    pub fn branch(&mut self, parent: NodeId, args: BranchingArgs) -> NodeId {
        if let Some(&existing) = self.nodes[parent.0].index.get(&args) {
            return existing;
        }
        let child = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(Some(args.clone())));
        let node = &mut self.nodes[parent.0];
        node.index.insert(args, child);
        node.children.push(child);
        child
    }

    /// Branch along a chain of args, returning the last node.
    pub fn branch_path<I>(&mut self, parent: NodeId, path: I) -> NodeId
    where
        I: IntoIterator<Item = BranchingArgs>,
    {
        path.into_iter()
            .fold(parent, |node, args| self.branch(node, args))
    }

    pub fn args(&self, node: NodeId) -> Option<&BranchingArgs> {
        self.nodes[node.0].args.as_ref()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Number of branches (the root is not counted).
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every branch of `other` below `at`, collapsing equal branches.
    pub fn graft(&mut self, at: NodeId, other: &PropertyTree) {
        self.graft_subtree(at, other, other.root());
    }

    /// Copy the branches below `from` in `other` to below `at`.
    pub fn graft_subtree(&mut self, at: NodeId, other: &PropertyTree, from: NodeId) {
        for &child in other.children(from) {
            if let Some(args) = other.args(child) {
                let target = self.branch(at, args.clone());
                self.graft_subtree(target, other, child);
            }
        }
    }

    /// Union of two trees at their roots.
    pub fn merge(&mut self, other: &PropertyTree) {
        let root = self.root();
        self.graft(root, other);
    }

    /// Place every branch into `pattern`, depth first, starting at `position`.
    pub fn traverse(
        &self,
        factories: &BranchFactories,
        pattern: &mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<(), TreeError> {
        self.traverse_children(self.root(), factories, pattern, position, arena)
    }

    fn traverse_children(
        &self,
        node: NodeId,
        factories: &BranchFactories,
        pattern: &mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<(), TreeError> {
        for &child in self.children(node) {
            let Some(args) = self.args(child) else {
                continue;
            };
            let factory = factories.factory_for(args)?;
            log::debug!("PropertyTree: placing {} with `{}`", args, factory.name());
            let placement = factory.place(args, pattern, position, arena)?;
            self.traverse_children(child, factories, placement.pattern, placement.position, arena)?;
        }
        Ok(())
    }
}
