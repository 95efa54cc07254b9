use crate::entity_catalog::{EntitySchema, EntityType, SchemaError};
use crate::graph_pattern::{quote_literal, ToSparql, TreeGraphPattern};
use crate::property_tree::{AnyArgs, BranchFactories, BranchingArgs, Position, PropertyTree};
use crate::variable_mapping::{MappingArena, MappingId, ScopeKey};

use super::ast::FilterExpr;
use super::errors::FilterCompileError;
use super::translator::{ExpressionTranslator, FilterScope};

/// Where a property path currently stands while it is being resolved.
struct PathCursor<'s> {
    branches: Vec<BranchingArgs>,
    owner: &'s EntityType,
    mapping: MappingId,
    /// Some step so far is an optional property
    optional: bool,
}

/// Compiles a [`FilterExpr`] into a clause and the property tree it depends on.
///
/// Variables come from the same [`MappingArena`] the expand compiler filled, so
/// a filtered property that is also selected reads the same variable.
pub struct FilterCompiler<'s> {
    schema: &'s EntitySchema,
    factories: &'s BranchFactories,
}

impl<'s> FilterCompiler<'s> {
    pub fn new(schema: &'s EntitySchema, factories: &'s BranchFactories) -> Self {
        FilterCompiler { schema, factories }
    }

    pub fn compile(
        &self,
        expr: &FilterExpr,
        scope: &FilterScope,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<ExpressionTranslator, FilterCompileError> {
        match expr {
            FilterExpr::StringLiteral { value } => {
                Ok(ExpressionTranslator::literal(quote_literal(value)))
            }
            FilterExpr::NumericLiteral { value } => {
                Ok(ExpressionTranslator::literal(render_number(*value)?))
            }
            FilterExpr::BooleanLiteral { value } => {
                Ok(ExpressionTranslator::literal(value.to_string()))
            }
            FilterExpr::NullLiteral => Ok(ExpressionTranslator::null(arena.fresh_variable())),
            FilterExpr::And { lhs, rhs } => {
                self.compile_binary("&&", lhs, rhs, scope, position, arena)
            }
            FilterExpr::Or { lhs, rhs } => {
                self.compile_binary("||", lhs, rhs, scope, position, arena)
            }
            FilterExpr::Eq { lhs, rhs } => self.compile_eq(lhs, rhs, scope, position, arena),
            FilterExpr::Parentheses { inner } => self.compile(inner, scope, position, arena),
            FilterExpr::PropertyValue { path } => {
                self.compile_property_value(path, scope, position, arena)
            }
            FilterExpr::Any {
                path,
                variable,
                predicate,
            } => self.compile_any(path, variable, predicate, scope, position, arena),
        }
    }

    fn compile_binary(
        &self,
        operator: &str,
        lhs: &FilterExpr,
        rhs: &FilterExpr,
        scope: &FilterScope,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<ExpressionTranslator, FilterCompileError> {
        let left = self.compile(lhs, scope, position, arena)?;
        let right = self.compile(rhs, scope, position, arena)?;
        let clause = format!("({} {} {})", left.clause(), operator, right.clause());
        let mut tree = left.property_tree().clone();
        tree.merge(right.property_tree());
        Ok(ExpressionTranslator::expression(clause, tree))
    }

    /// `(l = r)`, plus a disjunct that makes two unbound operands compare equal
    /// when either side is `null`.
    fn compile_eq(
        &self,
        lhs: &FilterExpr,
        rhs: &FilterExpr,
        scope: &FilterScope,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<ExpressionTranslator, FilterCompileError> {
        let left = self.compile(lhs, scope, position, arena)?;
        let right = self.compile(rhs, scope, position, arena)?;

        let mut clause = format!("({} = {})", left.clause(), right.clause());
        // A literal operand is always bound, so the disjunct would be constant false
        if (left.can_be_unbound() || right.can_be_unbound())
            && left.is_variable()
            && right.is_variable()
        {
            clause = format!(
                "({} || !(BOUND({}) || BOUND({})))",
                clause,
                left.clause(),
                right.clause()
            );
        }

        let mut tree = left.property_tree().clone();
        tree.merge(right.property_tree());
        Ok(ExpressionTranslator::expression(clause, tree))
    }

    fn compile_property_value(
        &self,
        path: &[String],
        scope: &FilterScope,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<ExpressionTranslator, FilterCompileError> {
        let (mut cursor, start) = self.resolve_start(path, scope, position, arena)?;
        let Some((last, middle)) = path[start..].split_last() else {
            return Err(SchemaError::invalid_path(path, "path names no property").into());
        };
        for segment in middle {
            self.navigate(&mut cursor, segment, path, arena)?;
        }

        let mut property = cursor.owner.property(last)?;
        // Foreign-key copies are read through the related entity's Id
        if let Some([related, related_id]) = self.schema.resolve_foreign_key(cursor.owner, property)? {
            self.navigate(&mut cursor, &related.name, path, arena)?;
            property = related_id;
        }
        if !property.is_elementary() {
            return Err(SchemaError::invalid_path(
                path,
                format!("`{}` is a navigation property, not a value", property.name),
            )
            .into());
        }

        cursor.branches.push(BranchingArgs::property(
            self.schema,
            cursor.owner,
            property,
        )?);
        let variable = arena.elementary(cursor.mapping, &property.name);
        let can_be_unbound = cursor.optional || !property.is_mandatory();

        let mut tree = PropertyTree::new();
        let root = tree.root();
        tree.branch_path(root, cursor.branches);
        Ok(ExpressionTranslator::variable(variable, tree, can_be_unbound))
    }

    /// `path/any(variable: predicate)` becomes an `EXISTS` over the collection edge
    /// with the predicate's bindings nested inside it. Only the navigation up to
    /// the collection is exposed to the enclosing pattern.
    fn compile_any(
        &self,
        path: &[String],
        variable: &str,
        predicate: &FilterExpr,
        scope: &FilterScope,
        position: Position,
        arena: &mut MappingArena,
    ) -> Result<ExpressionTranslator, FilterCompileError> {
        let (mut cursor, start) = self.resolve_start(path, scope, position, arena)?;
        let Some((collection_name, middle)) = path[start..].split_last() else {
            return Err(SchemaError::invalid_path(path, "`any` needs a collection property").into());
        };
        for segment in middle {
            self.navigate(&mut cursor, segment, path, arena)?;
        }

        let collection = cursor.owner.property(collection_name)?;
        if collection.is_cardinality_one() {
            return Err(SchemaError::invalid_path(
                path,
                format!("`any` requires a collection, `{}` is single-valued", collection.name),
            )
            .into());
        }
        let (edge, inverse) = self.schema.edge(collection)?;
        let element_type = self.schema.target_type(collection)?;

        let key = ScopeKey::fresh();
        let inner_scope = arena.scope(position.scope, key);
        arena.define_namespace(inner_scope, variable, &element_type.name)?;
        let body = self.compile(
            predicate,
            &scope.with_lambda(variable, &element_type.name),
            Position {
                mapping: position.mapping,
                scope: inner_scope,
            },
            arena,
        )?;

        let mut join = PropertyTree::new();
        let root = join.root();
        let at = join.branch_path(root, cursor.branches.clone());
        let any_node = join.branch(
            at,
            BranchingArgs::Any(AnyArgs {
                name: collection.name.clone(),
                predicate: edge,
                inverse,
                lambda_variable: variable.to_string(),
                scope: key,
            }),
        );
        let lambda = BranchingArgs::InScopeVariable {
            name: variable.to_string(),
            entity_type: element_type.name.clone(),
        };
        let body_tree = body.property_tree();
        for &child in body_tree.children(body_tree.root()) {
            let Some(args) = body_tree.args(child) else {
                continue;
            };
            let parent = if *args == lambda { any_node } else { root };
            let node = join.branch(parent, args.clone());
            join.graft_subtree(node, body_tree, child);
        }

        let mut pattern = TreeGraphPattern::new(arena.variable(position.mapping));
        join.traverse(self.factories, &mut pattern, position, arena)?;
        let clause = format!(
            "EXISTS {{ {} FILTER({}) }}",
            pattern.to_sparql(),
            body.clause()
        );
        log::debug!("FilterCompiler: any over `{}` → {}", collection.name, clause);

        let mut exposed = PropertyTree::new();
        let exposed_root = exposed.root();
        exposed.branch_path(exposed_root, cursor.branches);
        Ok(ExpressionTranslator::expression(clause, exposed))
    }

    /// Starting point of a path: the lambda variable it begins with, or the
    /// filtered entity. Returns the cursor and the index of the first segment
    /// still to resolve.
    fn resolve_start(
        &self,
        path: &[String],
        scope: &FilterScope,
        position: Position,
        arena: &MappingArena,
    ) -> Result<(PathCursor<'s>, usize), FilterCompileError> {
        let root_type = self.schema.entity_type(scope.entity_type())?;
        let root = PathCursor {
            branches: Vec::new(),
            owner: root_type,
            mapping: position.mapping,
            optional: false,
        };
        let Some(first) = path.first() else {
            return Ok((root, 0));
        };

        if scope.lambda_type(first).is_none() {
            return Ok((root, 0));
        }

        let namespace = arena.namespace(position.scope, first)?;
        let owner = self.schema.entity_type(&namespace.entity_type)?;
        Ok((
            PathCursor {
                branches: vec![BranchingArgs::InScopeVariable {
                    name: first.clone(),
                    entity_type: namespace.entity_type.clone(),
                }],
                owner,
                mapping: namespace.mapping,
                optional: false,
            },
            1,
        ))
    }

    /// Step over one single-valued navigation property.
    fn navigate(
        &self,
        cursor: &mut PathCursor<'s>,
        segment: &str,
        path: &[String],
        arena: &mut MappingArena,
    ) -> Result<(), FilterCompileError> {
        let property = cursor.owner.property(segment)?;
        if property.is_elementary() {
            return Err(SchemaError::invalid_path(
                path,
                format!("`{}` is not a navigation property", segment),
            )
            .into());
        }
        if !property.is_cardinality_one() {
            return Err(SchemaError::invalid_path(
                path,
                format!("collection `{}` can only be navigated with `any`", segment),
            )
            .into());
        }
        cursor.branches.push(BranchingArgs::property(
            self.schema,
            cursor.owner,
            property,
        )?);
        cursor.mapping = arena.complex(cursor.mapping, segment);
        cursor.optional |= !property.is_mandatory();
        cursor.owner = self.schema.target_type(property)?;
        Ok(())
    }
}

/// Canonical decimal text; integral values render without a fraction so they
/// compare equal to `xsd:integer` data.
fn render_number(value: f64) -> Result<String, FilterCompileError> {
    if !value.is_finite() {
        return Err(FilterCompileError::InvalidLiteral {
            value: value.to_string(),
            reason: "numbers must be finite".to_string(),
        });
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Ok(format!("{}", value as i64))
    } else {
        Ok(value.to_string())
    }
}
