//! Article catalog models and schema helpers for pubfeed.
//!
//! This crate defines the record shapes shared by the feed normalizer, the
//! query engine, and every transport adapter.

pub mod models;
pub mod schema;

pub use models::*;
