use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::errors::ScopeError;
use super::variable_mapping::{MappingArena, MappingId};

static NEXT_SCOPE_KEY: AtomicU64 = AtomicU64::new(0);

/// Identity of one `any` sub-expression.
///
/// Keys are unique for the lifetime of the process, so two textually identical
/// quantifiers in one query never share a scope (and never share variables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey(u64);

impl ScopeKey {
    pub fn fresh() -> Self {
        ScopeKey(NEXT_SCOPE_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a [`ScopedMapping`] inside its [`MappingArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A variable bound by a quantifier: its own mapping plus the entity type the
/// variable ranges over.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub mapping: MappingId,
    pub entity_type: String,
}

/// One level of the lambda-scope chain.
#[derive(Debug, Clone)]
pub struct ScopedMapping {
    root: MappingId,
    parent: Option<ScopeId>,
    children: HashMap<ScopeKey, ScopeId>,
    namespaces: HashMap<String, Namespace>,
}

impl ScopedMapping {
    pub fn root(&self) -> MappingId {
        self.root
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }
}

impl MappingArena {
    /// Start a scope chain over `root`. Each compilation owns its own chain root.
    pub fn root_scope(&mut self, root: MappingId) -> ScopeId {
        self.push_scope(root, None)
    }

    fn push_scope(&mut self, root: MappingId, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.push(ScopedMapping {
            root,
            parent,
            children: HashMap::new(),
            namespaces: HashMap::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub fn scoped_mapping(&self, scope: ScopeId) -> &ScopedMapping {
        &self.scopes[scope.0]
    }

    /// Child scope for `key`, created on first access with the same root mapping.
    ///
    /// Re-entering the same quantifier returns the same child, so its variables
    /// are not allocated twice.
    pub fn scope(&mut self, scope: ScopeId, key: ScopeKey) -> ScopeId {
        if let Some(&existing) = self.scopes[scope.0].children.get(&key) {
            return existing;
        }
        let root = self.scopes[scope.0].root;
        let child = self.push_scope(root, Some(scope));
        self.scopes[scope.0].children.insert(key, child);
        child
    }

    /// Bind a quantifier variable in `scope` to a brand-new mapping.
    pub fn define_namespace(
        &mut self,
        scope: ScopeId,
        name: &str,
        entity_type: &str,
    ) -> Result<MappingId, ScopeError> {
        if self.scopes[scope.0].namespaces.contains_key(name) {
            return Err(ScopeError::NamespaceAlreadyDefined {
                name: name.to_string(),
            });
        }
        let mapping = self.new_mapping();
        log::debug!(
            "ScopedMapping: lambda variable `{}` ({}) → {}",
            name,
            entity_type,
            self.variable(mapping)
        );
        self.scopes[scope.0].namespaces.insert(
            name.to_string(),
            Namespace {
                mapping,
                entity_type: entity_type.to_string(),
            },
        );
        Ok(mapping)
    }

    /// Look `name` up in `scope`, then in each enclosing scope.
    pub fn namespace(&self, scope: ScopeId, name: &str) -> Result<&Namespace, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scoped = &self.scopes[id.0];
            if let Some(namespace) = scoped.namespaces.get(name) {
                return Ok(namespace);
            }
            current = scoped.parent;
        }
        Err(ScopeError::NamespaceNotFound {
            name: name.to_string(),
        })
    }
}
