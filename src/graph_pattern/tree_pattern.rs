use super::errors::PatternError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// `?root predicate ?target`
    Direct,
    /// `?target predicate ?root`
    Inverse,
}

/// One edge from the pattern root to a child pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBranch {
    pub predicate: String,
    pub direction: EdgeDirection,
    pub optional: bool,
    pub target: TreeGraphPattern,
}

impl PatternBranch {
    fn matches(&self, predicate: &str, direction: EdgeDirection, optional: bool, target: &str) -> bool {
        self.predicate == predicate
            && self.direction == direction
            && self.optional == optional
            && self.target.root() == target
    }
}

/// A graph pattern organised as a tree around a named root variable.
///
/// - branches: direct or inverse edges to child patterns, plain or OPTIONAL
/// - leaves: edges to fixed terms (`rdf:type disco:Post`)
/// - union alternatives: mutually exclusive sibling patterns over the same root
/// - conjunctive patterns: independent sub-patterns AND-ed into this one
///
/// One union alternative may be designated as the single-valued slot, which
/// collects every extra that adds at most one row per entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeGraphPattern {
    root: String,
    branches: Vec<PatternBranch>,
    leaves: Vec<(String, String)>,
    union: Vec<TreeGraphPattern>,
    single_valued_slot: Option<usize>,
    conjunctive: Vec<TreeGraphPattern>,
}

impl TreeGraphPattern {
    pub fn new(root: impl Into<String>) -> Self {
        TreeGraphPattern {
            root: root.into(),
            branches: Vec::new(),
            leaves: Vec::new(),
            union: Vec::new(),
            single_valued_slot: None,
            conjunctive: Vec::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn branches(&self) -> &[PatternBranch] {
        &self.branches
    }

    pub fn leaves(&self) -> &[(String, String)] {
        &self.leaves
    }

    pub fn union_alternatives(&self) -> &[TreeGraphPattern] {
        &self.union
    }

    pub fn conjunctive_patterns(&self) -> &[TreeGraphPattern] {
        &self.conjunctive
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
            && self.leaves.is_empty()
            && self.union.iter().all(TreeGraphPattern::is_empty)
            && self.conjunctive.iter().all(TreeGraphPattern::is_empty)
    }

    /// `?root predicate ?target`
    pub fn branch(&mut self, predicate: &str, target: &str) -> &mut TreeGraphPattern {
        self.add_branch(predicate, target, EdgeDirection::Direct, false)
    }

    /// `?target predicate ?root`
    pub fn inverse_branch(&mut self, predicate: &str, target: &str) -> &mut TreeGraphPattern {
        self.add_branch(predicate, target, EdgeDirection::Inverse, false)
    }

    /// `OPTIONAL { ?root predicate ?target ... }`
    pub fn optional_branch(&mut self, predicate: &str, target: &str) -> &mut TreeGraphPattern {
        self.add_branch(predicate, target, EdgeDirection::Direct, true)
    }

    /// `OPTIONAL { ?target predicate ?root ... }`
    pub fn optional_inverse_branch(
        &mut self,
        predicate: &str,
        target: &str,
    ) -> &mut TreeGraphPattern {
        self.add_branch(predicate, target, EdgeDirection::Inverse, true)
    }

    /// Add an edge to a child pattern rooted at `target`, or return the existing
    /// child when the same edge was already added.
    pub fn add_branch(
        &mut self,
        predicate: &str,
        target: &str,
        direction: EdgeDirection,
        optional: bool,
    ) -> &mut TreeGraphPattern {
        let position = match self
            .branches
            .iter()
            .position(|b| b.matches(predicate, direction, optional, target))
        {
            Some(position) => position,
            None => {
                self.branches.push(PatternBranch {
                    predicate: predicate.to_string(),
                    direction,
                    optional,
                    target: TreeGraphPattern::new(target),
                });
                self.branches.len() - 1
            }
        };
        &mut self.branches[position].target
    }

    /// `?root predicate term`, where `term` is already rendered (a prefixed name or
    /// a quoted literal).
    pub fn leaf(&mut self, predicate: &str, term: &str) {
        let exists = self
            .leaves
            .iter()
            .any(|(p, t)| p == predicate && t == term);
        if !exists {
            self.leaves.push((predicate.to_string(), term.to_string()));
        }
    }

    /// Open a new union alternative over the same root.
    pub fn new_union_alternative(&mut self) -> &mut TreeGraphPattern {
        self.union.push(TreeGraphPattern::new(self.root.clone()));
        let last = self.union.len() - 1;
        &mut self.union[last]
    }

    /// The union alternative shared by all single-valued extras, created on first use.
    pub fn single_valued_slot(&mut self) -> &mut TreeGraphPattern {
        let position = match self.single_valued_slot {
            Some(position) => position,
            None => {
                self.union.push(TreeGraphPattern::new(self.root.clone()));
                let position = self.union.len() - 1;
                self.single_valued_slot = Some(position);
                position
            }
        };
        &mut self.union[position]
    }

    /// Open an independent sub-pattern rooted at `root` that is AND-ed into this one.
    /// Used to join loosely to a variable that is not reached through an edge.
    pub fn conjunctive_pattern(&mut self, root: &str) -> &mut TreeGraphPattern {
        self.conjunctive.push(TreeGraphPattern::new(root));
        let last = self.conjunctive.len() - 1;
        &mut self.conjunctive[last]
    }

    pub fn add_conjunctive(&mut self, pattern: TreeGraphPattern) {
        self.conjunctive.push(pattern);
    }

    /// Merge `other` into this pattern. Both must share the same root.
    ///
    /// Edges present in both collapse into one, with their child patterns merged
    /// recursively; everything else is appended.
    pub fn merge(&mut self, other: TreeGraphPattern) -> Result<(), PatternError> {
        if self.root != other.root {
            return Err(PatternError::RootMismatch {
                left: self.root.clone(),
                right: other.root,
            });
        }

        for branch in other.branches {
            let target_root = branch.target.root.clone();
            let existing = self.branches.iter_mut().find(|b| {
                b.matches(&branch.predicate, branch.direction, branch.optional, &target_root)
            });
            match existing {
                Some(existing) => existing.target.merge(branch.target)?,
                None => self.branches.push(branch),
            }
        }

        for (predicate, term) in other.leaves {
            self.leaf(&predicate, &term);
        }

        let other_slot = other.single_valued_slot;
        for (position, alternative) in other.union.into_iter().enumerate() {
            if Some(position) == other_slot {
                self.single_valued_slot().merge(alternative)?;
            } else {
                self.union.push(alternative);
            }
        }

        self.conjunctive.extend(other.conjunctive);
        Ok(())
    }
}
