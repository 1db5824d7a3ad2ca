//! Parsers for origin content.
//!
//! The feed parser normalizes RSS items into catalog articles and falls back
//! to keyword classification when an item carries no categories.

pub mod rss;
pub mod topics;

pub use rss::{FeedParseError, RssFeedParser};
pub use topics::classify_topics;
