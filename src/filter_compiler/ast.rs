use serde::{Deserialize, Serialize};

/// Filter expression as delivered by the request parser.
///
/// The JSON form is internally tagged, e.g.
/// `{"type": "eq", "lhs": {"type": "property", "path": ["Id"]}, "rhs": {"type": "number", "value": 2}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterExpr {
    #[serde(rename = "string")]
    StringLiteral { value: String },
    #[serde(rename = "number")]
    NumericLiteral { value: f64 },
    #[serde(rename = "boolean")]
    BooleanLiteral { value: bool },
    #[serde(rename = "null")]
    NullLiteral,
    And {
        lhs: Box<FilterExpr>,
        rhs: Box<FilterExpr>,
    },
    Or {
        lhs: Box<FilterExpr>,
        rhs: Box<FilterExpr>,
    },
    Eq {
        lhs: Box<FilterExpr>,
        rhs: Box<FilterExpr>,
    },
    Parentheses { inner: Box<FilterExpr> },
    /// Member access: `Content/Title`, or `it/Id` inside a lambda
    #[serde(rename = "property")]
    PropertyValue { path: Vec<String> },
    /// `path/any(variable: predicate)`; `path` ends at the collection property
    Any {
        path: Vec<String>,
        variable: String,
        predicate: Box<FilterExpr>,
    },
}

impl FilterExpr {
    pub fn string(value: impl Into<String>) -> Self {
        FilterExpr::StringLiteral {
            value: value.into(),
        }
    }

    pub fn number(value: f64) -> Self {
        FilterExpr::NumericLiteral { value }
    }

    pub fn boolean(value: bool) -> Self {
        FilterExpr::BooleanLiteral { value }
    }

    pub fn null() -> Self {
        FilterExpr::NullLiteral
    }

    pub fn property<S: AsRef<str>>(path: &[S]) -> Self {
        FilterExpr::PropertyValue {
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    pub fn eq(lhs: FilterExpr, rhs: FilterExpr) -> Self {
        FilterExpr::Eq {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn and(lhs: FilterExpr, rhs: FilterExpr) -> Self {
        FilterExpr::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: FilterExpr, rhs: FilterExpr) -> Self {
        FilterExpr::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn parentheses(inner: FilterExpr) -> Self {
        FilterExpr::Parentheses {
            inner: Box::new(inner),
        }
    }

    pub fn any<S: AsRef<str>>(path: &[S], variable: &str, predicate: FilterExpr) -> Self {
        FilterExpr::Any {
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
            variable: variable.to_string(),
            predicate: Box::new(predicate),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            FilterExpr::StringLiteral { .. }
                | FilterExpr::NumericLiteral { .. }
                | FilterExpr::BooleanLiteral { .. }
                | FilterExpr::NullLiteral
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_from_json() {
        let json = r#"{
            "type": "any",
            "path": ["Children"],
            "variable": "it",
            "predicate": {
                "type": "eq",
                "lhs": {"type": "property", "path": ["it", "Id"]},
                "rhs": {"type": "number", "value": 2}
            }
        }"#;
        let expr: FilterExpr = serde_json::from_str(json).unwrap();
        assert_eq!(
            expr,
            FilterExpr::any(
                &["Children"],
                "it",
                FilterExpr::eq(FilterExpr::property(&["it", "Id"]), FilterExpr::number(2.0))
            )
        );
    }

    #[test]
    fn test_null_and_parentheses_from_json() {
        let json = r#"{"type": "parentheses", "inner": {"type": "null"}}"#;
        let expr: FilterExpr = serde_json::from_str(json).unwrap();
        assert_eq!(expr, FilterExpr::parentheses(FilterExpr::null()));
    }

    #[test]
    fn test_unknown_node_kind_is_rejected() {
        let json = r#"{"type": "gt", "lhs": {"type": "null"}, "rhs": {"type": "null"}}"#;
        assert!(serde_json::from_str::<FilterExpr>(json).is_err());
    }
}
