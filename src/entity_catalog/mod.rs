pub mod config;
pub mod entity_schema;
pub mod errors;

pub use config::SchemaConfig;
pub use entity_schema::{
    Cardinality, EntityKind, EntitySchema, EntityType, Generation, Property, ID_PROPERTY,
};
pub use errors::SchemaError;

#[cfg(test)]
pub(crate) mod test_schema;
