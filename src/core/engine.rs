//! Build engine
//!
//! Orchestrates the two independent build steps: esbuild transpilation and
//! asset copying. The steps share no state and run concurrently; the build
//! finishes when both have, and fails when either does.

use crate::assets::AssetCopier;
use crate::bundler::EsbuildRunner;
use crate::core::BuildMetadata;
use crate::error::{Result, TsBuildError};
use crate::progress::BuildReporter;
use std::path::Path;
use std::time::{Duration, Instant};

/// Build operation result
#[derive(Debug)]
pub struct BuildResult {
    /// Wall-clock duration of the whole build
    pub duration: Duration,
    /// Entry points handed to esbuild
    pub entry_points: usize,
    /// Assets copied by the copy step
    pub assets_copied: u64,
    /// Asset bytes copied
    pub asset_bytes: u64,
}

/// Main build engine
pub struct BuildEngine {
    /// Derived build metadata
    metadata: BuildMetadata,
    /// Remove the output directory before building
    clean: bool,
    /// Progress reporter
    reporter: BuildReporter,
}

impl BuildEngine {
    /// Create a new build engine
    pub fn new(metadata: BuildMetadata) -> Self {
        Self {
            metadata,
            clean: false,
            reporter: BuildReporter::disabled(),
        }
    }

    /// Clean the output directory before building
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Set the progress reporter
    pub fn with_reporter(mut self, reporter: BuildReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run the build: optional clean, then transpile and asset copy
    /// concurrently.
    pub async fn execute(&self) -> Result<BuildResult> {
        let start = Instant::now();

        if self.clean {
            clean_output_dir(&self.metadata.out_dir)?;
            self.reporter
                .notice(&format!("Cleaned '{}'", self.metadata.out_dir.display()));
        }

        let bundler = EsbuildRunner::new().with_quiet(!self.reporter.is_enabled());
        let copier = AssetCopier::new(&self.metadata.assets)?;

        self.reporter.notice(&format!(
            "Transpiling {} entry points into '{}'",
            self.metadata.esbuild.entry_points.len(),
            self.metadata.out_dir.display()
        ));

        let ((), assets) = tokio::try_join!(
            bundler.run(&self.metadata.esbuild),
            copier.copy(),
        )?;

        let result = BuildResult {
            duration: start.elapsed(),
            entry_points: self.metadata.esbuild.entry_points.len(),
            assets_copied: assets.files_copied,
            asset_bytes: assets.bytes_copied,
        };

        self.reporter.notice(&format!(
            "Copied {} assets from '{}'",
            result.assets_copied,
            self.metadata.assets.base_dir.display()
        ));
        self.reporter.finish(result.duration);

        Ok(result)
    }
}

/// Remove the output directory, treating a missing directory as success.
pub fn clean_output_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TsBuildError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_directory_tree() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("nested/stale.js"), "x").unwrap();

        clean_output_dir(&out).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_clean_missing_directory_is_ok() {
        let dir = TempDir::new().unwrap();
        clean_output_dir(&dir.path().join("never-created")).unwrap();
    }

    #[test]
    fn test_clean_propagates_real_errors() {
        let dir = TempDir::new().unwrap();
        // A file is not a directory; remove_dir_all must fail
        let file = dir.path().join("dist");
        fs::write(&file, "not a dir").unwrap();
        assert!(clean_output_dir(&file).is_err());
    }
}
