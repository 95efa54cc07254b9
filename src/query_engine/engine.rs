use serde_json::Value;

use crate::entity_catalog::EntitySchema;
use crate::expand_compiler::{ExpandTree, ExpandTreeCompiler};
use crate::filter_compiler::{FilterCompileError, FilterCompiler, FilterScope};
use crate::graph_pattern::{SelectQuery, ToSparql};
use crate::property_tree::{BranchFactories, Position};
use crate::result_decoder::ResultDecoder;
use crate::store::TripleStore;
use crate::variable_mapping::{MappingArena, MappingId};

use super::errors::QueryError;
use super::request::ReadRequest;

/// A read request compiled to SPARQL, together with the variable bookkeeping the
/// decoder needs to fold the result rows back into entities.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub sparql: String,
    pub arena: MappingArena,
    pub root: MappingId,
    pub entity_type: String,
    pub expand: ExpandTree,
}

/// Compiles and runs read requests against one schema.
pub struct QueryEngine<'s> {
    schema: &'s EntitySchema,
    factories: BranchFactories,
}

impl<'s> QueryEngine<'s> {
    pub fn new(schema: &'s EntitySchema) -> Self {
        Self::with_factories(schema, BranchFactories::builtin())
    }

    /// Use a custom placement registry, e.g. one with an extra factory prepended.
    pub fn with_factories(schema: &'s EntitySchema, factories: BranchFactories) -> Self {
        QueryEngine { schema, factories }
    }

    pub fn schema(&self) -> &EntitySchema {
        self.schema
    }

    pub fn compile(&self, request: &ReadRequest) -> Result<CompiledQuery, QueryError> {
        let entity_type = self.schema.entity_set(&request.entity_set)?;
        if let Some(id) = &request.by_id {
            if !id.is_literal() {
                return Err(FilterCompileError::InvalidLiteral {
                    value: format!("{:?}", id),
                    reason: "an entity id must be a literal".to_string(),
                }
                .into());
            }
        }

        let mut arena = MappingArena::new();
        let root = arena.new_mapping();
        let scope = arena.root_scope(root);
        let position = Position {
            mapping: root,
            scope,
        };

        let mut pattern = ExpandTreeCompiler::new(self.schema, &self.factories).compile(
            entity_type,
            &request.expand,
            &mut arena,
            position,
        )?;

        let clause = match request.effective_filter() {
            Some(filter) => {
                let translator = FilterCompiler::new(self.schema, &self.factories).compile(
                    &filter,
                    &FilterScope::new(&entity_type.name),
                    position,
                    &mut arena,
                )?;
                let (clause, tree) = translator.into_parts();
                // The filter bindings join the whole pattern, not one union alternative.
                let root_variable = arena.variable(root).to_string();
                let filter_pattern = pattern.conjunctive_pattern(&root_variable);
                tree.traverse(&self.factories, filter_pattern, position, &mut arena)?;
                Some(clause)
            }
            None => None,
        };

        let sparql = SelectQuery::new(self.schema.prefixes(), pattern)
            .with_filter(clause)
            .to_sparql();
        log::debug!("Generated SPARQL for {}:\n{}", request.entity_set, sparql);

        Ok(CompiledQuery {
            sparql,
            arena,
            root,
            entity_type: entity_type.name.clone(),
            expand: request.expand.clone(),
        })
    }

    /// Compile `request`, run it on `store` and decode the rows.
    ///
    /// Collection reads yield a JSON array; by-id reads yield the entity or `null`.
    pub async fn execute(
        &self,
        store: &dyn TripleStore,
        request: &ReadRequest,
    ) -> Result<Value, QueryError> {
        let compiled = self.compile(request)?;
        let rows = store.select(&compiled.sparql).await?;

        let entity_type = self.schema.entity_type(&compiled.entity_type)?;
        let entities = ResultDecoder::new(self.schema, &compiled.arena).decode(
            entity_type,
            &compiled.expand,
            compiled.root,
            &rows,
        )?;
        log::info!(
            "Read {}: {} rows → {} entities",
            request.entity_set,
            rows.len(),
            entities.len()
        );

        if request.is_by_id() {
            Ok(entities.into_iter().next().unwrap_or(Value::Null))
        } else {
            Ok(Value::Array(entities))
        }
    }
}

pub fn compile_read_request(
    schema: &EntitySchema,
    request: &ReadRequest,
) -> Result<CompiledQuery, QueryError> {
    QueryEngine::new(schema).compile(request)
}

pub async fn execute_read_request(
    store: &dyn TripleStore,
    schema: &EntitySchema,
    request: &ReadRequest,
) -> Result<Value, QueryError> {
    QueryEngine::new(schema).execute(store, request).await
}
