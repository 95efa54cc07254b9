use crate::entity_catalog::ID_PROPERTY;
use crate::expand_compiler::ExpandTree;
use crate::filter_compiler::FilterExpr;

/// One read of an entity set: optional navigation expansion, optional filter,
/// optional lookup by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub entity_set: String,
    pub expand: ExpandTree,
    pub filter: Option<FilterExpr>,
    /// Literal the `Id` must equal
    pub by_id: Option<FilterExpr>,
}

impl ReadRequest {
    pub fn collection(entity_set: impl Into<String>) -> Self {
        ReadRequest {
            entity_set: entity_set.into(),
            expand: ExpandTree::new(),
            filter: None,
            by_id: None,
        }
    }

    pub fn by_id(entity_set: impl Into<String>, id: FilterExpr) -> Self {
        ReadRequest {
            by_id: Some(id),
            ..Self::collection(entity_set)
        }
    }

    pub fn with_expand(mut self, expand: ExpandTree) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn is_by_id(&self) -> bool {
        self.by_id.is_some()
    }

    /// The user filter AND-ed with `Id eq <literal>` for by-id reads.
    pub fn effective_filter(&self) -> Option<FilterExpr> {
        let id_filter = self
            .by_id
            .clone()
            .map(|id| FilterExpr::eq(FilterExpr::property(&[ID_PROPERTY]), id));
        match (id_filter, self.filter.clone()) {
            (Some(id_filter), Some(filter)) => Some(FilterExpr::and(
                id_filter,
                FilterExpr::parentheses(filter),
            )),
            (id_filter, filter) => id_filter.or(filter),
        }
    }
}
