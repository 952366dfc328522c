//! Build metadata derivation
//!
//! Turns the merged user configuration and the resolved tsconfig into the
//! concrete options passed to the transpile and asset copy steps. All the
//! default-substitution and precedence rules live here.

use crate::config::{ModuleFormat, UserConfig};
use crate::tsconfig::{CompilerOptions, TsConfig};
use std::path::{Path, PathBuf};

/// Output directory used when neither the user config nor tsconfig names one
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Target forwarded to esbuild when neither config names one
pub const DEFAULT_TARGET: &str = "es6";

/// Asset base directory when the user config does not name one
pub const DEFAULT_ASSET_BASE_DIR: &str = "src";

/// Source extensions never copied by the asset step
pub const SOURCE_EXCLUDE_PATTERN: &str = "**/*.{ts,js,tsx,jsx}";

/// Source-map emission mode derived from tsconfig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMapMode {
    /// No source maps
    Disabled,
    /// External .map files referenced by a comment
    Linked,
    /// Source map embedded in the output file
    Inline,
}

impl SourceMapMode {
    /// The esbuild CLI flag for this mode, if any
    pub fn as_flag(&self) -> Option<&'static str> {
        match self {
            SourceMapMode::Disabled => None,
            SourceMapMode::Linked => Some("--sourcemap"),
            SourceMapMode::Inline => Some("--sourcemap=inline"),
        }
    }
}

/// Derive the source-map mode from tsconfig compiler options.
///
/// `inlineSources` without any map output is contradictory, and `sourceMap`
/// plus `inlineSourceMap` are mutually exclusive in tsconfig; both cases
/// disable map emission rather than guessing.
pub fn source_map_mode(options: &CompilerOptions) -> SourceMapMode {
    let source_map = options.source_map.unwrap_or(false);
    let inline_source_map = options.inline_source_map.unwrap_or(false);
    let inline_sources = options.inline_sources.unwrap_or(false);

    if inline_sources && !inline_source_map && !source_map {
        return SourceMapMode::Disabled;
    }

    if source_map && inline_source_map {
        return SourceMapMode::Disabled;
    }

    if inline_source_map {
        return SourceMapMode::Inline;
    }

    if source_map {
        SourceMapMode::Linked
    } else {
        SourceMapMode::Disabled
    }
}

/// Options for the esbuild invocation
#[derive(Debug, Clone)]
pub struct EsbuildOptions {
    /// Output directory
    pub out_dir: PathBuf,
    /// Entry points: tsconfig file list followed by user entry points
    pub entry_points: Vec<PathBuf>,
    /// Source-map mode
    pub source_map: SourceMapMode,
    /// Target environment, forwarded verbatim
    pub target: String,
    /// Minify output
    pub minify: bool,
    /// Output module format
    pub format: ModuleFormat,
    /// tsconfig path forwarded to esbuild
    pub tsconfig: PathBuf,
    /// Raw user arguments appended to the command line
    pub extra_args: Vec<String>,
}

/// Options for the asset copy step
#[derive(Debug, Clone)]
pub struct AssetOptions {
    /// Directory scanned for assets
    pub base_dir: PathBuf,
    /// Destination directory
    pub out_dir: PathBuf,
    /// Include globs, relative to `base_dir`
    pub include_patterns: Vec<String>,
    /// Exclude globs, relative to `base_dir`
    pub exclude_patterns: Vec<String>,
}

/// Everything the build engine needs, derived once up front
#[derive(Debug, Clone)]
pub struct BuildMetadata {
    /// Resolved output directory
    pub out_dir: PathBuf,
    /// Transpile step options
    pub esbuild: EsbuildOptions,
    /// Asset copy step options
    pub assets: AssetOptions,
}

/// Derive build metadata from the merged user config and resolved tsconfig.
pub fn derive_build_metadata(config: &UserConfig, tsconfig: &TsConfig) -> BuildMetadata {
    let out_dir = config
        .out_dir
        .clone()
        .or_else(|| tsconfig.compiler_options.out_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    let mut entry_points = tsconfig.file_names.clone();
    entry_points.extend(config.esbuild.entry_points.iter().cloned());

    let target = config
        .esbuild
        .target
        .clone()
        .or_else(|| tsconfig.compiler_options.target.clone())
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());

    let esbuild = EsbuildOptions {
        out_dir: out_dir.clone(),
        entry_points,
        source_map: source_map_mode(&tsconfig.compiler_options),
        target,
        minify: config.esbuild.minify,
        format: config.esbuild.format.unwrap_or_default(),
        tsconfig: tsconfig.path.clone(),
        extra_args: config.esbuild.extra_args.clone(),
    };

    let assets = derive_asset_options(config, &out_dir);

    BuildMetadata {
        out_dir,
        esbuild,
        assets,
    }
}

fn derive_asset_options(config: &UserConfig, out_dir: &Path) -> AssetOptions {
    let mut include_patterns = Vec::new();
    let mut exclude_patterns = Vec::new();

    let user_patterns = &config.assets.file_patterns;
    if user_patterns.is_empty() {
        include_patterns.push("**".to_string());
    } else {
        for pattern in user_patterns {
            match pattern.strip_prefix('!') {
                Some(negated) => exclude_patterns.push(negated.to_string()),
                None => include_patterns.push(pattern.clone()),
            }
        }
    }
    exclude_patterns.push(SOURCE_EXCLUDE_PATTERN.to_string());

    AssetOptions {
        base_dir: config
            .assets
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_BASE_DIR)),
        out_dir: config
            .assets
            .out_dir
            .clone()
            .unwrap_or_else(|| out_dir.to_path_buf()),
        include_patterns,
        exclude_patterns,
    }
}
