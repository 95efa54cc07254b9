use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nested set of requested navigation paths.
///
/// `Children/Parent` and `Content` give `{Children: {Parent: {}}, Content: {}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandTree {
    children: BTreeMap<String, ExpandTree>,
}

impl ExpandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `/`-separated paths; empty segments are skipped.
    pub fn parse<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = ExpandTree::new();
        for path in paths {
            let segments: Vec<&str> = path
                .as_ref()
                .split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            tree.add_path(&segments);
        }
        tree
    }

    pub fn add_path<S: AsRef<str>>(&mut self, segments: &[S]) {
        let mut node = self;
        for segment in segments {
            node = node
                .children
                .entry(segment.as_ref().to_string())
                .or_default();
        }
    }

    pub fn with_path<S: AsRef<str>>(mut self, segments: &[S]) -> Self {
        self.add_path(segments);
        self
    }

    pub fn child(&self, name: &str) -> Option<&ExpandTree> {
        self.children.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
