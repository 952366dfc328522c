//! Configuration module for tsbuild
//!
//! Provides configuration management including CLI arguments,
//! the optional user config file, and merge semantics between the two.

mod settings;

pub use settings::*;
