use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PatternError {
    #[error("Cannot merge graph pattern rooted at `{right}` into pattern rooted at `{left}`")]
    RootMismatch { left: String, right: String },
}
