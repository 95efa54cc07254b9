use crate::entity_catalog::{EntitySchema, EntityType, SchemaError};
use crate::graph_pattern::TreeGraphPattern;
use crate::property_tree::{BranchFactories, BranchingArgs, NodeId, Position, PropertyTree};
use crate::variable_mapping::MappingArena;

use super::errors::ExpandError;
use super::expand_tree::ExpandTree;

pub struct ExpandTreeCompiler<'s> {
    schema: &'s EntitySchema,
    factories: &'s BranchFactories,
}

impl<'s> ExpandTreeCompiler<'s> {
    pub fn new(schema: &'s EntitySchema, factories: &'s BranchFactories) -> Self {
        ExpandTreeCompiler { schema, factories }
    }

    /// Property selection: all elementary properties, and the complex ones named
    /// in `expand`, recursively.
    pub fn select_properties(
        &self,
        entity_type: &EntityType,
        expand: &ExpandTree,
    ) -> Result<PropertyTree, ExpandError> {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        self.select_into(&mut tree, root, entity_type, expand)?;
        Ok(tree)
    }

    fn select_into(
        &self,
        tree: &mut PropertyTree,
        node: NodeId,
        entity_type: &EntityType,
        expand: &ExpandTree,
    ) -> Result<(), ExpandError> {
        for name in expand.names() {
            let property = entity_type.find_property(name).ok_or_else(|| {
                SchemaError::property_not_found_with_context(
                    &entity_type.name,
                    name,
                    "while resolving $expand",
                )
            })?;
            if property.is_elementary() {
                return Err(SchemaError::invalid_path(
                    &[name.to_string()],
                    "only navigation properties can be expanded",
                )
                .into());
            }
        }

        for property in entity_type.properties() {
            if property.is_elementary() {
                tree.branch(
                    node,
                    BranchingArgs::property(self.schema, entity_type, property)?,
                );
            } else if let Some(sub_expand) = expand.child(&property.name) {
                let child = tree.branch(
                    node,
                    BranchingArgs::property(self.schema, entity_type, property)?,
                );
                let target = self.schema.target_type(property)?;
                self.select_into(tree, child, target, sub_expand)?;
            }
        }
        Ok(())
    }

    /// Build the read pattern for `entity_type` rooted at the variable of
    /// `position.mapping`.
    pub fn compile(
        &self,
        entity_type: &EntityType,
        expand: &ExpandTree,
        arena: &mut MappingArena,
        position: Position,
    ) -> Result<TreeGraphPattern, ExpandError> {
        let tree = self.select_properties(entity_type, expand)?;
        log::debug!(
            "ExpandTreeCompiler: {} branches selected for {}",
            tree.len(),
            entity_type
        );

        let mut pattern = TreeGraphPattern::new(arena.variable(position.mapping));
        if let Some(class) = &entity_type.class {
            pattern.leaf("rdf:type", class);
        }
        tree.traverse(self.factories, &mut pattern, position, arena)?;
        Ok(pattern)
    }
}
