//! CLI command implementations.

pub mod check;
pub mod flags;
pub mod versions;
