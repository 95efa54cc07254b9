//! Builtin placement rules.
//!
//! | Rule                         | Applies to                              | Placement                                   |
//! |------------------------------|-----------------------------------------|---------------------------------------------|
//! | [`ElementaryIdBranch`]       | the `Id` property                       | plain edge on the current root              |
//! | [`MandatoryElementaryBranch`]| other mandatory elementary properties   | plain edge in the single-valued slot        |
//! | [`OptionalElementaryBranch`] | optional elementary properties          | OPTIONAL edge on the current root           |
//! | [`MirroredElementaryBranch`] | foreign-key copies                      | two hops in the single-valued slot          |
//! | [`SingleValuedComplexBranch`]| cardinality-one navigation              | (OPTIONAL) edge in the single-valued slot   |
//! | [`MultiValuedComplexBranch`] | collection navigation                   | OPTIONAL edge in a new union alternative    |
//! | [`InScopeVariableBranch`]    | lambda variables                        | conjunctive pattern at the variable         |
//! | [`AnyBranch`]                | `any` collection edges                  | OPTIONAL edge to the lambda variable        |
//!
//! Keeping every multi-valued expansion in its own union alternative stops two
//! collections of one entity from multiplying into a cross product.

use crate::entity_catalog::ID_PROPERTY;
use crate::graph_pattern::{EdgeDirection, TreeGraphPattern};
use crate::variable_mapping::MappingArena;

use super::branch_factory::{BranchFactory, Placement, Position};
use super::branching_args::{AnyArgs, BranchingArgs, PropertyArgs};
use super::errors::TreeError;

fn direction(inverse: bool) -> EdgeDirection {
    if inverse {
        EdgeDirection::Inverse
    } else {
        EdgeDirection::Direct
    }
}

fn unmirrored_elementary(args: &BranchingArgs) -> Option<&PropertyArgs> {
    args.as_property()
        .filter(|p| !p.complex && p.mirrored_from.is_none())
}

/// Only called after `applies_to` accepted the args.
fn property_args(args: &BranchingArgs) -> Result<&PropertyArgs, TreeError> {
    args.as_property().ok_or_else(|| TreeError::NoFactoryApplies {
        args: args.to_string(),
    })
}

pub struct ElementaryIdBranch;

impl BranchFactory for ElementaryIdBranch {
    fn name(&self) -> &'static str {
        "elementary-id"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        unmirrored_elementary(args).is_some_and(|p| p.is_id() && p.mandatory)
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let p = property_args(args)?;
        let variable = arena.elementary(position.mapping, &p.name);
        Ok(Placement {
            pattern: pattern.branch(&p.predicate, &variable),
            position,
        })
    }
}

pub struct MandatoryElementaryBranch;

impl BranchFactory for MandatoryElementaryBranch {
    fn name(&self) -> &'static str {
        "mandatory-elementary"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        unmirrored_elementary(args).is_some_and(|p| !p.is_id() && p.mandatory)
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let p = property_args(args)?;
        let variable = arena.elementary(position.mapping, &p.name);
        Ok(Placement {
            pattern: pattern.single_valued_slot().branch(&p.predicate, &variable),
            position,
        })
    }
}

pub struct OptionalElementaryBranch;

impl BranchFactory for OptionalElementaryBranch {
    fn name(&self) -> &'static str {
        "optional-elementary"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        unmirrored_elementary(args).is_some_and(|p| !p.mandatory)
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let p = property_args(args)?;
        let variable = arena.elementary(position.mapping, &p.name);
        Ok(Placement {
            pattern: pattern.optional_branch(&p.predicate, &variable),
            position,
        })
    }
}

/// A foreign-key copy is read through the related entity: the property variable
/// is the related mapping's `Id` variable, so expanding the related entity in
/// the same query reuses the same edges.
pub struct MirroredElementaryBranch;

impl BranchFactory for MirroredElementaryBranch {
    fn name(&self) -> &'static str {
        "mirrored-elementary"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        args.as_property()
            .is_some_and(|p| !p.complex && p.mirrored_from.is_some())
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let p = property_args(args)?;
        let mirrored = p
            .mirrored_from
            .as_ref()
            .ok_or_else(|| TreeError::NoFactoryApplies {
                args: args.to_string(),
            })?;

        let related = arena.complex(position.mapping, &mirrored.property);
        let related_variable = arena.variable(related).to_string();
        let id_variable = arena.elementary(related, ID_PROPERTY);
        arena.link_elementary(position.mapping, &p.name, &id_variable);

        let hop = pattern.single_valued_slot().add_branch(
            &mirrored.predicate,
            &related_variable,
            direction(mirrored.inverse),
            !p.mandatory,
        );
        Ok(Placement {
            pattern: hop.branch(&mirrored.id_predicate, &id_variable),
            position,
        })
    }
}

pub struct SingleValuedComplexBranch;

impl BranchFactory for SingleValuedComplexBranch {
    fn name(&self) -> &'static str {
        "single-valued-complex"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        args.as_property().is_some_and(|p| p.complex && p.single_valued)
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let p = property_args(args)?;
        let child = arena.complex(position.mapping, &p.name);
        let variable = arena.variable(child).to_string();
        let target = pattern.single_valued_slot().add_branch(
            &p.predicate,
            &variable,
            direction(p.inverse),
            !p.mandatory,
        );
        Ok(Placement {
            pattern: target,
            position: Position {
                mapping: child,
                scope: position.scope,
            },
        })
    }
}

pub struct MultiValuedComplexBranch;

impl BranchFactory for MultiValuedComplexBranch {
    fn name(&self) -> &'static str {
        "multi-valued-complex"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        args.as_property().is_some_and(|p| p.complex && !p.single_valued)
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let p = property_args(args)?;
        let child = arena.complex(position.mapping, &p.name);
        let variable = arena.variable(child).to_string();
        // OPTIONAL so that entities with an empty collection still produce a row
        let target = pattern.new_union_alternative().add_branch(
            &p.predicate,
            &variable,
            direction(p.inverse),
            true,
        );
        Ok(Placement {
            pattern: target,
            position: Position {
                mapping: child,
                scope: position.scope,
            },
        })
    }
}

pub struct InScopeVariableBranch;

impl BranchFactory for InScopeVariableBranch {
    fn name(&self) -> &'static str {
        "in-scope-variable"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        matches!(args, BranchingArgs::InScopeVariable { .. })
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let BranchingArgs::InScopeVariable { name, .. } = args else {
            return Err(TreeError::NoFactoryApplies {
                args: args.to_string(),
            });
        };
        let mapping = arena.namespace(position.scope, name)?.mapping;
        let variable = arena.variable(mapping).to_string();
        Ok(Placement {
            pattern: pattern.conjunctive_pattern(&variable),
            position: Position {
                mapping,
                scope: position.scope,
            },
        })
    }
}

/// The collection edge of an `any`, with everything the lambda body binds nested
/// inside its OPTIONAL block. A parent without elements then binds none of the
/// lambda's variables and the predicate evaluates to false.
pub struct AnyBranch;

impl BranchFactory for AnyBranch {
    fn name(&self) -> &'static str {
        "any"
    }

    fn applies_to(&self, args: &BranchingArgs) -> bool {
        matches!(args, BranchingArgs::Any(_))
    }

    fn place<'p>(
        &self,
        args: &BranchingArgs,
        pattern: &'p mut TreeGraphPattern,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<Placement<'p>, TreeError> {
        let BranchingArgs::Any(AnyArgs {
            predicate,
            inverse,
            lambda_variable,
            scope,
            ..
        }) = args
        else {
            return Err(TreeError::NoFactoryApplies {
                args: args.to_string(),
            });
        };
        let inner_scope = arena.scope(position.scope, *scope);
        let mapping = arena.namespace(inner_scope, lambda_variable)?.mapping;
        let variable = arena.variable(mapping).to_string();
        Ok(Placement {
            pattern: pattern.add_branch(predicate, &variable, direction(*inverse), true),
            position: Position {
                mapping,
                scope: inner_scope,
            },
        })
    }
}
