use std::collections::HashMap;

use crate::property_tree::PropertyTree;

/// A compiled filter node: the boolean (or value) clause text plus the property
/// tree of bindings the clause reads.
#[derive(Debug, Clone)]
pub struct ExpressionTranslator {
    clause: String,
    tree: PropertyTree,
    can_be_unbound: bool,
    is_variable: bool,
}

impl ExpressionTranslator {
    /// A constant term; always bound.
    pub fn literal(clause: impl Into<String>) -> Self {
        ExpressionTranslator {
            clause: clause.into(),
            tree: PropertyTree::new(),
            can_be_unbound: false,
            is_variable: false,
        }
    }

    /// `null`, rendered as a variable that nothing binds.
    pub fn null(variable: impl Into<String>) -> Self {
        ExpressionTranslator {
            clause: variable.into(),
            tree: PropertyTree::new(),
            can_be_unbound: true,
            is_variable: true,
        }
    }

    /// The variable of a property path plus the branches that bind it.
    /// `can_be_unbound` is set when the path crosses an optional property.
    pub fn variable(
        variable: impl Into<String>,
        tree: PropertyTree,
        can_be_unbound: bool,
    ) -> Self {
        ExpressionTranslator {
            clause: variable.into(),
            tree,
            can_be_unbound,
            is_variable: true,
        }
    }

    /// A composite boolean expression.
    pub fn expression(clause: impl Into<String>, tree: PropertyTree) -> Self {
        ExpressionTranslator {
            clause: clause.into(),
            tree,
            can_be_unbound: false,
            is_variable: false,
        }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn property_tree(&self) -> &PropertyTree {
        &self.tree
    }

    pub fn can_be_unbound(&self) -> bool {
        self.can_be_unbound
    }

    pub fn is_variable(&self) -> bool {
        self.is_variable
    }

    pub fn into_parts(self) -> (String, PropertyTree) {
        (self.clause, self.tree)
    }
}

/// Names visible to a filter node: the entity type unqualified paths start from,
/// and the lambda variables of enclosing `any` expressions with their types.
#[derive(Debug, Clone)]
pub struct FilterScope {
    entity_type: String,
    lambda_variables: HashMap<String, String>,
}

impl FilterScope {
    pub fn new(entity_type: impl Into<String>) -> Self {
        FilterScope {
            entity_type: entity_type.into(),
            lambda_variables: HashMap::new(),
        }
    }

    /// A nested scope that also binds `name`.
    pub fn with_lambda(&self, name: &str, entity_type: &str) -> Self {
        let mut scope = self.clone();
        scope
            .lambda_variables
            .insert(name.to_string(), entity_type.to_string());
        scope
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn lambda_type(&self, name: &str) -> Option<&str> {
        self.lambda_variables.get(name).map(String::as_str)
    }
}
