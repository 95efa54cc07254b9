//! Integration tests - Tests that run compiled reads against a real triple store
//!
//! These tests load Turtle data into the embedded in-memory store, so they need
//! the `embedded` feature but no running service.

#![cfg(feature = "embedded")]

mod blog_store;
mod content_tests;
mod read_tests;
