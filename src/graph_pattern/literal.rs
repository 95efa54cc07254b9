//! Literal quoting for values inserted into generated clauses.
//!
//! Every user-supplied string reaches the query through [`quote_literal`], which
//! escapes the characters that could terminate or reshape a SPARQL string.

/// Escape `\ ' " \f \b \r \n \t` for use inside a SPARQL string literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\u{000C}' => escaped.push_str("\\f"),
            '\u{0008}' => escaped.push_str("\\b"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape and wrap in double quotes.
pub fn quote_literal(value: &str) -> String {
    format!("\"{}\"", escape_literal(value))
}
