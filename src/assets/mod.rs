//! Asset copy step module
//!
//! Copies non-source files from the asset base directory into the output
//! directory, preserving relative paths.

mod copier;

pub use copier::*;
