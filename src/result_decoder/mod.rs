//! Result Decoder
//!
//! A compiled query returns a flat table in which one entity can span many
//! rows: one per union alternative, and one per element of each expanded
//! collection. The decoder folds the rows back into nested objects:
//!
//! 1. every level is keyed by its `Id` variable; rows that do not bind it belong
//!    to a sibling alternative and are ignored at that level
//! 2. elementary values are recorded once and must agree across rows
//! 3. a single-valued navigation may resolve to at most one related entity
//!
//! A violation of 2 or 3 means the stored data does not match the declared
//! cardinality and is reported as [`DecodeError::InconsistentResult`].

pub mod decoder;
pub mod entity_collection;
pub mod errors;

pub use decoder::ResultDecoder;
pub use entity_collection::{Entity, EntityCollection};
pub use errors::DecodeError;
