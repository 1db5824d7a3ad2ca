//! Core services for pubfeed.
//!
//! This crate turns a remote syndication feed into a cached article catalog,
//! extracts article bodies from publication pages, and exposes the query
//! engine and tool registry shared by every transport adapter.

pub mod control;
pub mod extract;
pub mod origin;
pub mod parsers;
pub mod registry;
pub mod services;
