//! Core build orchestration module
//!
//! Provides build metadata derivation from the merged configuration and the
//! engine that runs the transpile and asset copy steps concurrently.

mod engine;
mod metadata;

pub use engine::*;
pub use metadata::*;
