//! Progress reporting module
//!
//! Provides the user-facing notices and the final timing line, with a
//! disabled variant for silent mode.

mod reporter;

pub use reporter::*;
