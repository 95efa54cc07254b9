use crate::graph_pattern::TreeGraphPattern;
use crate::variable_mapping::{MappingArena, MappingId, ScopeId};

use super::branching_args::BranchingArgs;
use super::errors::TreeError;
use super::placement;

/// Where the traversal currently stands: the mapping whose variables the next
/// branch uses and the lambda scope namespaces are looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub mapping: MappingId,
    pub scope: ScopeId,
}

/// Result of placing one branch: the sub-pattern and position its children are
/// placed from.
pub struct Placement<'p> {
    pub pattern: &'p mut TreeGraphPattern,
    pub position: Position,
}

/// A placement rule for property-tree branches.
pub trait BranchFactory: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self, args: &BranchingArgs) -> bool;

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError>;
}

/// Ordered registry of placement rules; the first applicable rule wins.
///
/// Built once at startup and shared read-only. Custom rules can be put in front
/// of the builtin ones with [`BranchFactories::prepend`].
pub struct BranchFactories {
    factories: Vec<Box<dyn BranchFactory>>,
}

impl BranchFactories {
    pub fn empty() -> Self {
        BranchFactories {
            factories: Vec::new(),
        }
    }

    /// The default rule set, in precedence order.
    pub fn builtin() -> Self {
        let mut factories = Self::empty();
        factories.push(Box::new(placement::ElementaryIdBranch));
        factories.push(Box::new(placement::MandatoryElementaryBranch));
        factories.push(Box::new(placement::OptionalElementaryBranch));
        factories.push(Box::new(placement::MirroredElementaryBranch));
        factories.push(Box::new(placement::SingleValuedComplexBranch));
        factories.push(Box::new(placement::MultiValuedComplexBranch));
        factories.push(Box::new(placement::InScopeVariableBranch));
        factories.push(Box::new(placement::AnyBranch));
        factories
    }

    pub fn push(&mut self, factory: Box<dyn BranchFactory>) {
        self.factories.push(factory);
    }

    /// Register a rule with precedence over every rule already present.
    pub fn prepend(&mut self, factory: Box<dyn BranchFactory>) {
        self.factories.insert(0, factory);
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn factory_for(&self, args: &BranchingArgs) -> Result<&dyn BranchFactory, TreeError> {
        self.factories
            .iter()
            .find(|factory| factory.applies_to(args))
            .map(|factory| factory.as_ref())
            .ok_or_else(|| TreeError::NoFactoryApplies {
                args: args.to_string(),
            })
    }
}

impl Default for BranchFactories {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for BranchFactories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|factory| factory.name()))
            .finish()
    }
}
