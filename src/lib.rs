//! # tsbuild - Thin Build Orchestrator for TypeScript Projects
//!
//! tsbuild reads a project's `tsconfig.json` and an optional `tsbuild.toml`
//! override file, derives build options from the two, then runs the external
//! `esbuild` binary to transpile sources while copying non-source assets
//! into the output directory. The two steps run concurrently and the build
//! finishes when both have.
//!
//! There is deliberately no compilation, bundling, or type-checking logic in
//! this crate: heavy lifting is delegated to esbuild and to the glob and
//! filesystem machinery underneath the asset step.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tsbuild::config::UserConfig;
//! use tsbuild::core::{derive_build_metadata, BuildEngine};
//! use tsbuild::tsconfig::TsConfig;
//! use std::path::Path;
//!
//! # async fn example() -> tsbuild::Result<()> {
//! let config = UserConfig::default();
//! let tsconfig = TsConfig::load(Path::new("."), config.tsconfig_file())?;
//! let metadata = derive_build_metadata(&config, &tsconfig);
//!
//! let result = BuildEngine::new(metadata).with_clean(true).execute().await?;
//! println!("built {} entry points in {:.2?}", result.entry_points, result.duration);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assets;
pub mod bundler;
pub mod config;
pub mod core;
pub mod error;
pub mod progress;
pub mod tsconfig;

// Re-export commonly used types
pub use config::{CliArgs, UserConfig};
pub use crate::core::{BuildEngine, BuildMetadata, BuildResult};
pub use error::{Result, TsBuildError};
pub use progress::BuildReporter;
pub use tsconfig::TsConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use tsbuild::prelude::*;
    //! ```

    pub use crate::assets::{AssetCopier, AssetCopySummary};
    pub use crate::bundler::EsbuildRunner;
    pub use crate::config::{load_user_config, CliArgs, UserConfig};
    pub use crate::core::{derive_build_metadata, BuildEngine, BuildMetadata, BuildResult};
    pub use crate::error::{Result, TsBuildError};
    pub use crate::progress::BuildReporter;
    pub use crate::tsconfig::TsConfig;
}
