//! Asset copier
//!
//! Walks the asset base directory, matches files against the include and
//! exclude glob sets, and copies matches to the same relative path under the
//! destination. Glob matching is delegated to globset, traversal to walkdir.

use crate::core::AssetOptions;
use crate::error::{Result, TsBuildError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Result of an asset copy run
#[derive(Debug, Default, Clone, Copy)]
pub struct AssetCopySummary {
    /// Files copied
    pub files_copied: u64,
    /// Bytes copied
    pub bytes_copied: u64,
}

/// Copies non-source files into the output directory
pub struct AssetCopier {
    base_dir: PathBuf,
    out_dir: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl AssetCopier {
    /// Create a copier from derived asset options
    pub fn new(options: &AssetOptions) -> Result<Self> {
        Ok(Self {
            base_dir: options.base_dir.clone(),
            out_dir: options.out_dir.clone(),
            include: build_globset(&options.include_patterns)?,
            exclude: build_globset(&options.exclude_patterns)?,
        })
    }

    /// Check whether a path relative to the base directory is an asset
    pub fn matches(&self, relative: &Path) -> bool {
        (self.include.is_empty() || self.include.is_match(relative))
            && !self.exclude.is_match(relative)
    }

    /// Copy all matching assets.
    ///
    /// A missing base directory means there is nothing to copy, not an
    /// error; projects without assets need no `src/` layout for the copy
    /// step's sake.
    pub async fn copy(&self) -> Result<AssetCopySummary> {
        let mut summary = AssetCopySummary::default();

        if !self.base_dir.is_dir() {
            debug!(
                "asset base dir '{}' does not exist, skipping copy",
                self.base_dir.display()
            );
            return Ok(summary);
        }

        let mut matched = Vec::new();
        for entry in WalkDir::new(&self.base_dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(&self.base_dir) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            if self.matches(&relative) {
                matched.push((entry.into_path(), relative));
            }
        }

        for (source, relative) in matched {
            let dest = self.out_dir.join(&relative);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| TsBuildError::io(parent.to_path_buf(), e))?;
            }
            let bytes = tokio::fs::copy(&source, &dest)
                .await
                .map_err(|e| TsBuildError::io(source.clone(), e))?;
            summary.files_copied += 1;
            summary.bytes_copied += bytes;
        }

        Ok(summary)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| TsBuildError::pattern(pattern.clone(), e.kind().to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| TsBuildError::pattern("<set>", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SOURCE_EXCLUDE_PATTERN;
    use std::fs;
    use tempfile::TempDir;

    fn options(base: &Path, out: &Path, patterns: &[&str]) -> AssetOptions {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        if patterns.is_empty() {
            include.push("**".to_string());
        } else {
            for p in patterns {
                match p.strip_prefix('!') {
                    Some(negated) => exclude.push(negated.to_string()),
                    None => include.push((*p).to_string()),
                }
            }
        }
        exclude.push(SOURCE_EXCLUDE_PATTERN.to_string());
        AssetOptions {
            base_dir: base.to_path_buf(),
            out_dir: out.to_path_buf(),
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    fn touch(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_copies_non_source_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("src");
        let out = dir.path().join("dist");
        touch(&base, "config.json", "{}");
        touch(&base, "templates/mail.html", "<html/>");
        touch(&base, "index.ts", "export {};");
        touch(&base, "legacy.js", "module.exports = {};");

        let copier = AssetCopier::new(&options(&base, &out, &[])).unwrap();
        let summary = copier.copy().await.unwrap();

        assert_eq!(summary.files_copied, 2);
        assert!(out.join("config.json").is_file());
        assert!(out.join("templates/mail.html").is_file());
        assert!(!out.join("index.ts").exists());
        assert!(!out.join("legacy.js").exists());
    }

    #[tokio::test]
    async fn test_custom_patterns_with_negation() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("src");
        let out = dir.path().join("dist");
        touch(&base, "a.json", "{}");
        touch(&base, "secret.json", "{}");
        touch(&base, "note.txt", "hi");

        let copier =
            AssetCopier::new(&options(&base, &out, &["**/*.json", "!**/secret.json"])).unwrap();
        let summary = copier.copy().await.unwrap();

        assert_eq!(summary.files_copied, 1);
        assert!(out.join("a.json").is_file());
        assert!(!out.join("secret.json").exists());
        assert!(!out.join("note.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_base_dir_is_empty_summary() {
        let dir = TempDir::new().unwrap();
        let copier = AssetCopier::new(&options(
            &dir.path().join("absent"),
            &dir.path().join("dist"),
            &[],
        ))
        .unwrap();

        let summary = copier.copy().await.unwrap();
        assert_eq!(summary.files_copied, 0);
        assert_eq!(summary.bytes_copied, 0);
    }

    #[tokio::test]
    async fn test_bytes_counted() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("src");
        let out = dir.path().join("dist");
        touch(&base, "data.bin", "12345678");

        let copier = AssetCopier::new(&options(&base, &out, &[])).unwrap();
        let summary = copier.copy().await.unwrap();

        assert_eq!(summary.files_copied, 1);
        assert_eq!(summary.bytes_copied, 8);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let options = AssetOptions {
            base_dir: PathBuf::from("src"),
            out_dir: PathBuf::from("dist"),
            include_patterns: vec!["a{".to_string()],
            exclude_patterns: vec![],
        };
        assert!(AssetCopier::new(&options).is_err());
    }
}
