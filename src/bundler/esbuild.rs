//! esbuild integration
//!
//! Maps derived build metadata onto the esbuild command line and runs the
//! binary. Bundling stays off (the esbuild CLI default); each entry point is
//! transpiled to a matching file in the output directory, which is what a
//! tsc-replacement build wants.

use crate::core::EsbuildOptions;
use crate::error::{Result, TsBuildError};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the esbuild binary looked up on PATH
pub const ESBUILD_BINARY: &str = "esbuild";

/// Get esbuild installation instructions
pub fn esbuild_install_instructions() -> &'static str {
    r#"
esbuild installation:

# npm (any platform)
npm install -g esbuild

# macOS (Homebrew)
brew install esbuild

# Standalone binary
curl -fsSL https://esbuild.github.io/dl/latest | sh

For more info: https://esbuild.github.io/getting-started/
"#
}

/// Runner for the external esbuild binary
pub struct EsbuildRunner {
    binary: PathBuf,
    quiet: bool,
}

impl EsbuildRunner {
    /// Create a runner using the `esbuild` binary from PATH
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(ESBUILD_BINARY),
            quiet: false,
        }
    }

    /// Use a specific esbuild binary instead of the PATH lookup
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Restrict esbuild's own logging to errors
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Transpile the configured entry points.
    ///
    /// A non-zero esbuild exit is a fatal build error carrying esbuild's
    /// stderr; on success any warnings esbuild printed are forwarded to the
    /// log.
    pub async fn run(&self, options: &EsbuildOptions) -> Result<()> {
        if options.entry_points.is_empty() {
            // Without entry points the esbuild CLI would wait on stdin
            return Err(TsBuildError::NoEntryPoints);
        }

        let args = self.command_args(options);
        debug!("running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TsBuildError::BundlerNotFound(format!(
                    "'{}' is not on PATH. {}",
                    self.binary.display(),
                    esbuild_install_instructions()
                )),
                _ => TsBuildError::io(self.binary.clone(), e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(TsBuildError::BundlerFailed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        // esbuild reports warnings on stderr even when it succeeds
        if !stderr.trim().is_empty() {
            warn!("{}", stderr.trim());
        }

        Ok(())
    }

    /// Assemble the esbuild command line for the given options
    fn command_args(&self, options: &EsbuildOptions) -> Vec<String> {
        let mut args: Vec<String> = options
            .entry_points
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        args.push(format!("--outdir={}", options.out_dir.display()));
        args.push(format!("--target={}", options.target));
        args.push(format!("--format={}", options.format));
        args.push(format!("--tsconfig={}", options.tsconfig.display()));
        args.push("--platform=node".to_string());

        if options.minify {
            args.push("--minify".to_string());
        }
        if let Some(flag) = options.source_map.as_flag() {
            args.push(flag.to_string());
        }
        if self.quiet {
            args.push("--log-level=error".to_string());
        }

        args.extend(options.extra_args.iter().cloned());
        args
    }
}

impl Default for EsbuildRunner {
    fn default() -> Self {
        Self::new()
    }
}
