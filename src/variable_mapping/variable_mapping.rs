use std::collections::HashMap;

use super::scoped_mapping::ScopedMapping;

/// Handle to a [`VariableMapping`] inside its [`MappingArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingId(usize);

/// Variables of one entity position in the property tree.
///
/// Built lazily: the first lookup of a property name allocates its variable (or
/// child mapping) and every later lookup returns the memoized one.
#[derive(Debug, Clone)]
pub struct VariableMapping {
    variable: String,
    elementary: HashMap<String, String>,
    complex: HashMap<String, MappingId>,
}

impl VariableMapping {
    fn new(variable: String) -> Self {
        VariableMapping {
            variable,
            elementary: HashMap::new(),
            complex: HashMap::new(),
        }
    }

    /// The variable bound to the entity itself
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn elementary_variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.elementary
            .iter()
            .map(|(name, variable)| (name.as_str(), variable.as_str()))
    }
}

/// Owner of all mappings and scopes of one compilation plus the shared variable
/// generator.
#[derive(Debug, Clone, Default)]
pub struct MappingArena {
    mappings: Vec<VariableMapping>,
    pub(super) scopes: Vec<ScopedMapping>,
    next_variable: usize,
}

impl MappingArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next variable name from the shared generator.
    pub fn fresh_variable(&mut self) -> String {
        let variable = format!("?x{}", self.next_variable);
        self.next_variable += 1;
        variable
    }

    /// Number of variables handed out so far
    pub fn allocated_variables(&self) -> usize {
        self.next_variable
    }

    /// Create a mapping with a freshly allocated root variable.
    pub fn new_mapping(&mut self) -> MappingId {
        let variable = self.fresh_variable();
        self.mappings.push(VariableMapping::new(variable));
        MappingId(self.mappings.len() - 1)
    }

    pub fn mapping(&self, id: MappingId) -> &VariableMapping {
        &self.mappings[id.0]
    }

    pub fn variable(&self, id: MappingId) -> &str {
        &self.mappings[id.0].variable
    }

    /// Variable of an elementary property, allocated on first access.
    pub fn elementary(&mut self, id: MappingId, name: &str) -> String {
        if let Some(existing) = self.mappings[id.0].elementary.get(name) {
            return existing.clone();
        }
        let variable = self.fresh_variable();
        log::debug!(
            "VariableMapping {}: {} → {}",
            self.mappings[id.0].variable,
            name,
            variable
        );
        self.mappings[id.0]
            .elementary
            .insert(name.to_string(), variable.clone());
        variable
    }

    /// Bind an elementary property to an existing variable unless it already has
    /// one. Returns the variable the property ends up with.
    ///
    /// Used for foreign-key copies, which read the related entity's id variable
    /// instead of a variable of their own.
    pub fn link_elementary(&mut self, id: MappingId, name: &str, variable: &str) -> String {
        self.mappings[id.0]
            .elementary
            .entry(name.to_string())
            .or_insert_with(|| variable.to_string())
            .clone()
    }

    /// Child mapping of a complex property, created on first access.
    pub fn complex(&mut self, id: MappingId, name: &str) -> MappingId {
        if let Some(&existing) = self.mappings[id.0].complex.get(name) {
            return existing;
        }
        let child = self.new_mapping();
        log::debug!(
            "VariableMapping {}: {} → {}",
            self.mappings[id.0].variable,
            name,
            self.mappings[child.0].variable
        );
        self.mappings[id.0].complex.insert(name.to_string(), child);
        child
    }

    /// Read-only lookup; never allocates.
    pub fn get_elementary(&self, id: MappingId, name: &str) -> Option<&str> {
        self.mappings[id.0].elementary.get(name).map(String::as_str)
    }

    /// Read-only lookup; never allocates.
    pub fn get_complex(&self, id: MappingId, name: &str) -> Option<MappingId> {
        self.mappings[id.0].complex.get(name).copied()
    }
}
