//! CLI command implementations.

pub mod scan;
pub mod strategies;
pub mod validate;
