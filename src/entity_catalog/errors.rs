//! # Entity Schema Error Types
//!
//! Errors raised while loading a schema definition or while resolving
//! entity types, entity sets and property paths against it.
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: unknown entity type, entity set or property
//! - **Path Errors**: a property path whose segments do not fit the schema
//! - **Configuration Errors**: file I/O, YAML parsing and invariant violations
//!
//! Lookup and path errors indicate a mismatch between an incoming request and
//! the schema. They are surfaced to the caller as bad requests and never retried.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("No entity type found for `{type_name}`")]
    EntityType { type_name: String },
    #[error("No entity set found for `{set_name}`")]
    EntitySet { set_name: String },
    #[error("Entity type `{type_name}` has no property `{property}`")]
    Property { type_name: String, property: String },
    #[error("Invalid property path `{path}`: {reason}")]
    InvalidPropertyPath { path: String, reason: String },
    #[error("Failed to read schema file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse schema: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },
}

/// Helper methods for creating errors with context information
impl SchemaError {
    /// Create a Property error with context information
    ///
    /// # Example
    /// ```ignore
    /// SchemaError::property_not_found_with_context(
    ///     "Post",
    ///     "Title",
    ///     "While selecting properties for $expand=Content"
    /// )
    /// ```
    pub fn property_not_found_with_context(
        type_name: impl Into<String>,
        property: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        let prop = property.into();
        let ctx = context.into();
        SchemaError::Property {
            type_name: type_name.into(),
            property: format!("{}\n  Context: {}", prop, ctx),
        }
    }

    /// Create an InvalidPropertyPath error from path segments
    pub fn invalid_path(segments: &[String], reason: impl Into<String>) -> Self {
        SchemaError::InvalidPropertyPath {
            path: segments.join("/"),
            reason: reason.into(),
        }
    }

    /// Create an InvalidSchema error naming the offending entity type
    pub fn invalid_schema_for(type_name: &str, message: impl Into<String>) -> Self {
        SchemaError::InvalidSchema {
            message: format!("entity type `{}`: {}", type_name, message.into()),
        }
    }
}
