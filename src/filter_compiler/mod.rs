//! Filter Compiler
//!
//! Compiles a parsed filter expression into two things:
//!
//! - a clause for the top-level `FILTER(...)` of the query, and
//! - the [`PropertyTree`] of bindings the clause reads, which the caller places
//!   next to the expand pattern so every result row carries them.
//!
//! ## Supported expressions
//!
//! | Node | Clause |
//! |------|--------|
//! | string / number / boolean literal | quoted or canonical literal text |
//! | `null` | a variable that is never bound |
//! | `and`, `or` | `(l && r)`, `(l \|\| r)` |
//! | `eq` | `(l = r)`, with `\|\| !(BOUND(l) \|\| BOUND(r))` when comparing against `null` |
//! | parentheses | the inner clause |
//! | property path | the variable of the final elementary property |
//! | `path/any(v: p)` | `EXISTS { <collection join> FILTER(p) }` |
//!
//! Each `any` opens a fresh lambda scope keyed by a process-unique [`ScopeKey`],
//! so two identical quantifiers in one filter never share variables.
//!
//! [`PropertyTree`]: crate::property_tree::PropertyTree
//! [`ScopeKey`]: crate::variable_mapping::ScopeKey

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod translator;

pub use ast::FilterExpr;
pub use compiler::FilterCompiler;
pub use errors::FilterCompileError;
pub use translator::{ExpressionTranslator, FilterScope};
