//! Configuration settings for tsbuild
//!
//! Defines the CLI arguments, the user config file schema, and the
//! merge rules that combine the two into the effective configuration.

use crate::error::{Result, TsBuildError};
use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default user config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tsbuild.toml";

/// Default tsconfig file name when the user config does not override it
pub const DEFAULT_TSCONFIG_FILE: &str = "tsconfig.json";

/// tsbuild - Thin build orchestrator for TypeScript projects
#[derive(Parser, Debug, Clone)]
#[command(name = "tsbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transpile TypeScript with esbuild and copy assets in one pass")]
#[command(long_about = r#"
Transpile TypeScript with esbuild and copy assets in one pass.

tsbuild reads your tsconfig.json (and an optional tsbuild.toml override
file), derives esbuild options from the two, then runs the esbuild binary
and an asset copy step concurrently.

Examples:
  tsbuild                          # Build with tsconfig.json + tsbuild.toml
  tsbuild --clean                  # Clear the output directory first
  tsbuild --config ci.toml --silent
"#)]
pub struct CliArgs {
    /// Path to the user config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, value_name = "PATH")]
    pub config: PathBuf,

    /// Clean the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Suppress log output
    #[arg(long)]
    pub silent: bool,
}

/// Output module format forwarded to esbuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// CommonJS modules
    #[default]
    Cjs,
    /// ECMAScript modules
    Esm,
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleFormat::Cjs => write!(f, "cjs"),
            ModuleFormat::Esm => write!(f, "esm"),
        }
    }
}

/// esbuild-specific overrides from the user config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EsbuildSection {
    /// Extra entry points appended to the tsconfig file list
    #[serde(default)]
    pub entry_points: Vec<PathBuf>,

    /// Minify output
    #[serde(default)]
    pub minify: bool,

    /// Target environment (forwarded verbatim, e.g. "es2020", "node18")
    pub target: Option<String>,

    /// Output module format
    pub format: Option<ModuleFormat>,

    /// Raw arguments appended to the esbuild command line
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Asset copy overrides from the user config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AssetsSection {
    /// Directory scanned for assets
    pub base_dir: Option<PathBuf>,

    /// Destination directory for assets (defaults to the build out dir)
    pub out_dir: Option<PathBuf>,

    /// Glob patterns selecting assets; a leading '!' excludes
    #[serde(default)]
    pub file_patterns: Vec<String>,
}

/// User configuration, loaded from the config file and merged with CLI flags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct UserConfig {
    /// Output directory override
    pub out_dir: Option<PathBuf>,

    /// Clean the output directory before building
    #[serde(default)]
    pub clean: bool,

    /// Suppress log output
    #[serde(default)]
    pub silent: bool,

    /// tsconfig file name to resolve
    pub tsconfig_file: Option<PathBuf>,

    /// esbuild overrides
    #[serde(default)]
    pub esbuild: EsbuildSection,

    /// Asset copy overrides
    #[serde(default)]
    pub assets: AssetsSection,
}

impl UserConfig {
    /// The tsconfig file name to resolve, defaulting to `tsconfig.json`
    pub fn tsconfig_file(&self) -> &Path {
        self.tsconfig_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_TSCONFIG_FILE))
    }

    /// OR-merge CLI flags over the file values. A flag can enable clean or
    /// silent mode but never disable a setting from the file.
    fn merge_cli(mut self, args: &CliArgs) -> Self {
        self.clean = self.clean || args.clean;
        self.silent = self.silent || args.silent;
        self
    }
}

/// Load the user config file and merge CLI flags into it.
///
/// A missing file falls back to the default configuration with a notice. A
/// file that fails to read or parse also falls back to the default, unless
/// silent mode was requested on the command line, in which case the error
/// propagates and aborts the run.
pub fn load_user_config(args: &CliArgs) -> Result<UserConfig> {
    if !args.config.exists() {
        if !args.silent {
            println!(
                "Config file '{}' does not exist, using default config",
                args.config.display()
            );
        }
        return Ok(UserConfig::default().merge_cli(args));
    }

    match read_config_file(&args.config) {
        Ok(config) => Ok(config.merge_cli(args)),
        Err(e) if args.silent => Err(e),
        Err(e) => {
            println!("Config file has some errors:");
            eprintln!("{}", e);
            println!("Using default config");
            Ok(UserConfig::default().merge_cli(args))
        }
    }
}

fn read_config_file(path: &Path) -> Result<UserConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| TsBuildError::io(path, e))?;
    toml::from_str(&text)
        .map_err(|e| TsBuildError::config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_with_config(path: PathBuf) -> CliArgs {
        CliArgs {
            config: path,
            clean: false,
            silent: false,
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let args = args_with_config(dir.path().join("nope.toml"));

        let config = load_user_config(&args).unwrap();
        assert!(config.out_dir.is_none());
        assert!(!config.clean);
        assert_eq!(config.tsconfig_file(), Path::new("tsconfig.json"));
    }

    #[test]
    fn test_full_config_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsbuild.toml");
        fs::write(
            &path,
            r#"
out-dir = "build"
clean = true
tsconfig-file = "tsconfig.build.json"

[esbuild]
entry-points = ["src/cli.ts"]
minify = true
target = "es2020"
format = "esm"
extra-args = ["--charset=utf8"]

[assets]
base-dir = "static"
file-patterns = ["**/*.json", "!**/secret.json"]
"#,
        )
        .unwrap();

        let config = load_user_config(&args_with_config(path)).unwrap();
        assert_eq!(config.out_dir.as_deref(), Some(Path::new("build")));
        assert!(config.clean);
        assert_eq!(config.tsconfig_file(), Path::new("tsconfig.build.json"));
        assert_eq!(config.esbuild.entry_points, vec![PathBuf::from("src/cli.ts")]);
        assert!(config.esbuild.minify);
        assert_eq!(config.esbuild.target.as_deref(), Some("es2020"));
        assert_eq!(config.esbuild.format, Some(ModuleFormat::Esm));
        assert_eq!(config.esbuild.extra_args, vec!["--charset=utf8"]);
        assert_eq!(config.assets.base_dir.as_deref(), Some(Path::new("static")));
        assert_eq!(config.assets.file_patterns.len(), 2);
    }

    #[test]
    fn test_cli_flags_or_merge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsbuild.toml");
        fs::write(&path, "clean = true\n").unwrap();

        let mut args = args_with_config(path);
        args.silent = true;

        let config = load_user_config(&args).unwrap();
        // File enabled clean, CLI enabled silent; both survive the merge.
        assert!(config.clean);
        assert!(config.silent);
    }

    #[test]
    fn test_broken_config_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsbuild.toml");
        fs::write(&path, "out-dir = [not toml").unwrap();

        let config = load_user_config(&args_with_config(path.clone())).unwrap();
        assert!(config.out_dir.is_none());

        // Silent mode propagates the parse error instead.
        let mut silent_args = args_with_config(path);
        silent_args.silent = true;
        assert!(load_user_config(&silent_args).is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsbuild.toml");
        fs::write(&path, "outDir = \"build\"\n").unwrap();

        let mut silent_args = args_with_config(path);
        silent_args.silent = true;
        let err = load_user_config(&silent_args).unwrap_err();
        assert!(matches!(err, TsBuildError::ConfigError(_)));
    }

    #[test]
    fn test_module_format_display() {
        assert_eq!(ModuleFormat::Cjs.to_string(), "cjs");
        assert_eq!(ModuleFormat::Esm.to_string(), "esm");
    }
}
