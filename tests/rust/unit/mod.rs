//! Unit tests - Tests the public read API against a mocked triple store
//!
//! No store is contacted; the mock checks the generated query and feeds rows back.

mod query_engine_tests;
mod schema_config_tests;
