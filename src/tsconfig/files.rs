//! Source file discovery
//!
//! Expands a tsconfig's `files`/`include`/`exclude` triple into the concrete
//! source file list, standing in for the file names the type checker itself
//! would resolve. Glob matching is delegated to globset, traversal to
//! walkdir.

use crate::error::{Result, TsBuildError};
use crate::tsconfig::CompilerOptions;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories the TypeScript compiler excludes unless told otherwise
const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// TypeScript source extensions
const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// JavaScript extensions, considered sources only under `allowJs`
const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Discover the source files selected by a tsconfig.
///
/// Explicit `files` entries are always included (and must exist). `include`
/// globs select the rest, defaulting to everything under `root` when neither
/// `files` nor `include` is given. `exclude` globs and the default excluded
/// directories are applied to included files only, never to explicit ones.
/// The result is sorted for deterministic entry-point ordering.
pub fn discover_source_files(
    root: &Path,
    files: Option<&[String]>,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
    options: &CompilerOptions,
) -> Result<Vec<PathBuf>> {
    let allow_js = options.allow_js.unwrap_or(false);
    let mut selected = BTreeSet::new();

    for name in files.unwrap_or_default() {
        let path = root.join(name);
        if !path.is_file() {
            return Err(TsBuildError::tsconfig(
                path,
                "listed in 'files' but does not exist",
            ));
        }
        selected.insert(path);
    }

    // TS only falls back to the implicit "everything" include when the
    // config names neither files nor include.
    let include_patterns: Vec<String> = match include {
        Some(patterns) => patterns
            .iter()
            .map(|p| expand_dir_pattern(root, p))
            .collect(),
        None if files.is_some() => Vec::new(),
        None => vec!["**/*".to_string()],
    };

    if !include_patterns.is_empty() {
        let include_set = build_globset(&include_patterns)?;
        let exclude_set = build_globset(&exclude_patterns(root, exclude, options))?;

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            // Prune excluded directories instead of walking into them
            if !entry.file_type().is_dir() {
                return true;
            }
            match entry.path().strip_prefix(root) {
                Ok(rel) if rel.as_os_str().is_empty() => true,
                Ok(rel) => !exclude_set.is_match(rel),
                Err(_) => true,
            }
        });

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !is_source_file(path, allow_js) {
                continue;
            }
            let rel = match path.strip_prefix(root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            if include_set.is_match(rel) && !exclude_set.is_match(rel) {
                selected.insert(path.to_path_buf());
            }
        }
    }

    Ok(selected.into_iter().collect())
}

/// Check whether a path has a TypeScript (or, with `allowJs`, JavaScript)
/// source extension.
pub fn is_source_file(path: &Path, allow_js: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    TS_EXTENSIONS.contains(&ext) || (allow_js && JS_EXTENSIONS.contains(&ext))
}

fn exclude_patterns(
    root: &Path,
    exclude: Option<&[String]>,
    options: &CompilerOptions,
) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();

    match exclude {
        Some(user) => {
            for p in user {
                patterns.push(expand_dir_pattern(root, p));
            }
        }
        None => {
            for d in DEFAULT_EXCLUDES {
                patterns.push((*d).to_string());
                patterns.push(format!("{}/**", d));
            }
            if let Some(out_dir) = &options.out_dir {
                if let Some(out) = out_dir.to_str() {
                    let trimmed = out.trim_end_matches('/');
                    patterns.push(trimmed.to_string());
                    patterns.push(format!("{}/**", trimmed));
                }
            }
        }
    }

    patterns
}

/// A bare directory pattern selects everything beneath the directory, the
/// way tsconfig treats `"include": ["src"]`.
fn expand_dir_pattern(root: &Path, pattern: &str) -> String {
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.is_empty() {
        return "**/*".to_string();
    }
    let has_meta = trimmed.contains(['*', '?', '[', '{']);
    if !has_meta && root.join(trimmed).is_dir() {
        return format!("{}/**/*", trimmed);
    }
    trimmed.to_string()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            TsBuildError::pattern(pattern.clone(), e.kind().to_string())
        })?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
