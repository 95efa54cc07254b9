use thiserror::Error;

/// Failures of the store round-trip. Passed through to the caller unmodified;
/// nothing here is retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store request failed: {message}")]
    Request { message: String },

    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed store response: {message}")]
    MalformedResponse { message: String },

    #[error("Store rejected the query: {message}")]
    Query { message: String },

    #[error("Failed to load data into the store: {message}")]
    Load { message: String },
}
