//! CLI command implementations.

pub mod common;
pub mod cycle;
pub mod lattice;
pub mod run;
pub mod version;
