//! CLI command implementations.

pub mod cms;
pub mod content;
pub mod migrate;
