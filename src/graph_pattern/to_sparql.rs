use super::tree_pattern::{EdgeDirection, PatternBranch, TreeGraphPattern};

pub trait ToSparql {
    fn to_sparql(&self) -> String;
}

fn triple(root: &str, branch: &PatternBranch) -> String {
    match branch.direction {
        EdgeDirection::Direct => format!("{} {} {} .", root, branch.predicate, branch.target.root()),
        EdgeDirection::Inverse => format!("{} {} {} .", branch.target.root(), branch.predicate, root),
    }
}

fn push_non_empty(parts: &mut Vec<String>, part: String) {
    if !part.is_empty() {
        parts.push(part);
    }
}

/// The first triple of the pattern's own group that binds its root.
///
/// Leaves come first, then plain edges. Plain edges are only placed for
/// single-valued properties, so the anchor never multiplies rows.
fn own_anchor(pattern: &TreeGraphPattern) -> Option<String> {
    let root = pattern.root();
    if let Some((predicate, term)) = pattern.leaves().first() {
        return Some(format!("{} {} {} .", root, predicate, term));
    }
    pattern
        .branches()
        .iter()
        .find(|branch| !branch.optional)
        .map(|branch| triple(root, branch))
}

/// Renders one group body (without the outer braces).
///
/// Order: leaf and edge triples, the sub-patterns of plain edges, conjunctive
/// patterns, union alternatives, OPTIONAL blocks. Empty parts are left out
/// instead of being rendered as `{ }`.
///
/// A braced group is evaluated on its own, so an OPTIONAL block in it needs a
/// root binding inside the same braces. When the group has no triple of its
/// own on the root, `anchor` (the nearest enclosing triple binding the root) is
/// repeated at its start.
fn render_group(pattern: &TreeGraphPattern, anchor: Option<&str>, braced: bool) -> String {
    let mut parts = Vec::new();
    let root = pattern.root();
    let own = own_anchor(pattern);
    let (optional, plain): (Vec<&PatternBranch>, Vec<&PatternBranch>) =
        pattern.branches().iter().partition(|b| b.optional);

    if braced && own.is_none() && !optional.is_empty() {
        if let Some(anchor) = anchor {
            parts.push(anchor.to_string());
        }
    }
    let anchor = own.as_deref().or(anchor);

    for (predicate, term) in pattern.leaves() {
        parts.push(format!("{} {} {} .", root, predicate, term));
    }
    for branch in &plain {
        parts.push(triple(root, branch));
    }
    for branch in &plain {
        let edge = triple(root, branch);
        push_non_empty(&mut parts, render_group(&branch.target, Some(&edge), false));
    }

    for conjunctive in pattern.conjunctive_patterns() {
        let inherited = if conjunctive.root() == root { anchor } else { None };
        let body = render_group(conjunctive, inherited, true);
        if !body.is_empty() {
            parts.push(format!("{{ {} }}", body));
        }
    }

    let alternatives: Vec<String> = pattern
        .union_alternatives()
        .iter()
        .map(|alternative| render_group(alternative, anchor, true))
        .filter(|body| !body.is_empty())
        .map(|body| format!("{{ {} }}", body))
        .collect();
    if !alternatives.is_empty() {
        parts.push(alternatives.join(" UNION "));
    }

    for branch in &optional {
        let edge = triple(root, branch);
        let mut inner = vec![edge.clone()];
        push_non_empty(&mut inner, render_group(&branch.target, Some(&edge), false));
        parts.push(format!("OPTIONAL {{ {} }}", inner.join(" ")));
    }

    parts.join(" ")
}

impl ToSparql for TreeGraphPattern {
    fn to_sparql(&self) -> String {
        render_group(self, None, false)
    }
}

/// A complete `SELECT *` query over one graph pattern.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub prefixes: Vec<(String, String)>,
    pub pattern: TreeGraphPattern,
    /// Boolean clause appended as a top-level `FILTER(...)`
    pub filter: Option<String>,
}

impl SelectQuery {
    pub fn new(prefixes: &[(String, String)], pattern: TreeGraphPattern) -> Self {
        SelectQuery {
            prefixes: prefixes.to_vec(),
            pattern,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }
}

impl ToSparql for SelectQuery {
    fn to_sparql(&self) -> String {
        let mut sparql = String::new();
        for (prefix, namespace) in &self.prefixes {
            sparql.push_str(&format!("PREFIX {}: <{}>\n", prefix, namespace));
        }

        let mut body = Vec::new();
        push_non_empty(&mut body, self.pattern.to_sparql());
        if let Some(filter) = &self.filter {
            body.push(format!("FILTER({})", filter));
        }
        sparql.push_str(&format!("SELECT * WHERE {{ {} }}", body.join(" ")));
        sparql
    }
}
