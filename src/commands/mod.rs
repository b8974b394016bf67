//! CLI command implementations.

pub mod sources;
pub mod update;
