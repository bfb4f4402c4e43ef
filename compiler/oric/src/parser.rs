//! Parser - Re-exports from `ori_parse`
//!
//! This module re-exports all types from the `ori_parse` crate.
//! The `ori_parse` crate is the single source of truth for parser types.

// Re-export everything from ori_parse
pub use ori_parse::*;
