use thiserror::Error;

/// Scope errors are compiler bugs, not user errors: a lambda variable can only be
/// referenced inside the `any` that binds it, and the filter compiler checks that
/// before it ever asks for a namespace.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScopeError {
    #[error("Lambda variable `{name}` is not bound in this scope or any enclosing scope")]
    NamespaceNotFound { name: String },

    #[error("Lambda variable `{name}` is already bound in this scope")]
    NamespaceAlreadyDefined { name: String },
}
