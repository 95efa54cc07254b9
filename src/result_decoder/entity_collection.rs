use std::collections::HashMap;

/// Entities of one nesting level, keyed by their `Id` value, in first-seen order.
#[derive(Debug, Default)]
pub struct EntityCollection {
    order: Vec<String>,
    entities: HashMap<String, Entity>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entity with `id`, created on first sight.
    pub fn entry(&mut self, id: &str) -> &mut Entity {
        if !self.entities.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.entities.entry(id.to_string()).or_default()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id).map(|entity| (id.as_str(), entity)))
    }
}

/// Values and nested collections gathered for one entity across all rows.
#[derive(Debug, Default)]
pub struct Entity {
    values: HashMap<String, String>,
    navigations: HashMap<String, EntityCollection>,
}

impl Entity {
    pub fn value(&self, property: &str) -> Option<&str> {
        self.values.get(property).map(String::as_str)
    }

    /// Record `value`; returns the previously recorded value when it differs.
    pub fn assign(&mut self, property: &str, value: &str) -> Option<String> {
        match self.values.get(property) {
            Some(existing) if existing != value => Some(existing.clone()),
            Some(_) => None,
            None => {
                self.values.insert(property.to_string(), value.to_string());
                None
            }
        }
    }

    pub fn navigation(&self, property: &str) -> Option<&EntityCollection> {
        self.navigations.get(property)
    }

    pub fn navigation_mut(&mut self, property: &str) -> &mut EntityCollection {
        self.navigations.entry(property.to_string()).or_default()
    }
}
