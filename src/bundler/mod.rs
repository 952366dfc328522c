//! Transpile step module
//!
//! Drives the external esbuild binary that does the actual transpilation.

mod esbuild;

pub use esbuild::*;
