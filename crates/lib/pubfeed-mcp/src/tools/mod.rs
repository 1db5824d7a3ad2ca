//! MCP tool modules.
//!
//! One router per operation set; a server mounts exactly one of them next to
//! the shared health tool.

pub mod catalog;
pub mod search;
