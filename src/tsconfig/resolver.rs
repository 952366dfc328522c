//! tsconfig.json location, parsing, and `extends` resolution
//!
//! tsconfig files are JSONC: comments and trailing commas are legal, so the
//! raw text is stripped down to plain JSON before it reaches serde. An
//! `extends` chain is resolved depth-first and merged field-by-field, the
//! extending file winning.

use crate::error::{IoResultExt, Result, TsBuildError};
use crate::tsconfig::discover_source_files;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Upper bound on `extends` chain length, to catch cycles
const MAX_EXTENDS_DEPTH: usize = 32;

/// Compiler options surfaced from tsconfig.json
///
/// Only the options that influence build metadata are modeled; everything
/// else in `compilerOptions` is ignored and left for esbuild itself to read
/// via the forwarded `--tsconfig` path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Output directory
    pub out_dir: Option<PathBuf>,
    /// Target environment string, forwarded verbatim
    pub target: Option<String>,
    /// Emit external source maps
    pub source_map: Option<bool>,
    /// Emit inline source maps
    pub inline_source_map: Option<bool>,
    /// Embed sources into the source map
    pub inline_sources: Option<bool>,
    /// Treat .js/.jsx files as sources
    pub allow_js: Option<bool>,
}

impl CompilerOptions {
    /// Merge `self` over `base`: present fields win, absent fields inherit.
    fn merged_over(self, base: CompilerOptions) -> Self {
        Self {
            out_dir: self.out_dir.or(base.out_dir),
            target: self.target.or(base.target),
            source_map: self.source_map.or(base.source_map),
            inline_source_map: self.inline_source_map.or(base.inline_source_map),
            inline_sources: self.inline_sources.or(base.inline_sources),
            allow_js: self.allow_js.or(base.allow_js),
        }
    }
}

/// Raw on-disk shape of a tsconfig file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    extends: Option<String>,
    #[serde(default)]
    compiler_options: CompilerOptions,
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

impl RawTsConfig {
    /// Merge `self` over an extended base config. `files`, `include`, and
    /// `exclude` replace wholesale when present; compiler options merge
    /// field-by-field.
    fn merged_over(self, base: RawTsConfig) -> Self {
        Self {
            extends: None,
            compiler_options: self.compiler_options.merged_over(base.compiler_options),
            files: self.files.or(base.files),
            include: self.include.or(base.include),
            exclude: self.exclude.or(base.exclude),
        }
    }
}

/// Fully resolved tsconfig: merged options plus the discovered file list
#[derive(Debug, Clone)]
pub struct TsConfig {
    /// Path of the resolved tsconfig file
    pub path: PathBuf,
    /// Directory containing the tsconfig file
    pub root: PathBuf,
    /// Compiler options after `extends` merging
    pub compiler_options: CompilerOptions,
    /// Source files discovered from `files`/`include`/`exclude`
    pub file_names: Vec<PathBuf>,
}

impl TsConfig {
    /// Locate and load a tsconfig, resolving the `extends` chain and
    /// discovering the source file list.
    ///
    /// `file_name` is searched upward from `cwd` through parent directories,
    /// the way the TypeScript compiler locates its configuration.
    pub fn load(cwd: &Path, file_name: &Path) -> Result<Self> {
        let path = find_config_file(cwd, file_name).ok_or_else(|| {
            TsBuildError::TsConfigNotFound {
                name: file_name.to_path_buf(),
                search_root: cwd.to_path_buf(),
            }
        })?;

        let raw = load_raw_chain(&path, 0)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let file_names = discover_source_files(
            &root,
            raw.files.as_deref(),
            raw.include.as_deref(),
            raw.exclude.as_deref(),
            &raw.compiler_options,
        )?;

        Ok(Self {
            path,
            root,
            compiler_options: raw.compiler_options,
            file_names,
        })
    }
}

/// Search upward from `start` for a config file named `name`.
///
/// An absolute `name` is checked directly without any search.
pub fn find_config_file(start: &Path, name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }

    for dir in start.ancestors() {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn load_raw_chain(path: &Path, depth: usize) -> Result<RawTsConfig> {
    if depth > MAX_EXTENDS_DEPTH {
        return Err(TsBuildError::tsconfig(
            path,
            "extends chain exceeds maximum depth (cycle?)",
        ));
    }

    let text = std::fs::read_to_string(path).with_path(path)?;
    let json = strip_jsonc(&text);
    let mut raw: RawTsConfig = serde_json::from_str(&json)
        .map_err(|e| TsBuildError::tsconfig(path, e.to_string()))?;

    if let Some(spec) = raw.extends.take() {
        let base_path = resolve_extends(path, &spec)?;
        let base = load_raw_chain(&base_path, depth + 1)?;
        raw = raw.merged_over(base);
    }

    Ok(raw)
}

/// Resolve an `extends` specifier relative to the extending file.
///
/// Relative and absolute specifiers resolve against the file's directory
/// (`.json` is appended when the extension is missing). Bare specifiers walk
/// `node_modules` directories upward, checking both the specifier itself and
/// a `tsconfig.json` inside a package directory.
fn resolve_extends(from: &Path, spec: &str) -> Result<PathBuf> {
    let dir = from.parent().unwrap_or_else(|| Path::new("."));

    if spec.starts_with("./") || spec.starts_with("../") || Path::new(spec).is_absolute() {
        return existing_config(dir.join(spec)).ok_or_else(|| {
            TsBuildError::tsconfig(from, format!("cannot resolve extends '{}'", spec))
        });
    }

    for ancestor in dir.ancestors() {
        let candidate = ancestor.join("node_modules").join(spec);
        if let Some(found) = existing_config(candidate) {
            return Ok(found);
        }
    }

    Err(TsBuildError::tsconfig(
        from,
        format!("cannot resolve extends '{}' through node_modules", spec),
    ))
}

fn existing_config(candidate: PathBuf) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate);
    }
    if candidate.is_dir() {
        let inner = candidate.join("tsconfig.json");
        if inner.is_file() {
            return Some(inner);
        }
        return None;
    }
    // "./tsconfig.base" means "./tsconfig.base.json"; the suffix is appended,
    // not substituted, so dotted base names stay intact
    if candidate.extension().map(|e| e != "json").unwrap_or(true) {
        let mut appended = candidate.into_os_string();
        appended.push(".json");
        let with_ext = PathBuf::from(appended);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    None
}

/// Strip JSONC comments and trailing commas, yielding plain JSON.
pub fn strip_jsonc(text: &str) -> String {
    let without_comments = strip_comments(text);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    // Drop a leading BOM if present
    if let Some(&'\u{feff}') = chars.peek() {
        chars.next();
    }

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    // Keep line numbers stable for parse errors
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                // A comma whose next significant char closes a scope is dropped
                let mut buffered = String::new();
                let mut drop_comma = false;
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() {
                        buffered.push(next);
                        chars.next();
                        continue;
                    }
                    drop_comma = next == '}' || next == ']';
                    break;
                }
                if !drop_comma {
                    out.push(',');
                }
                out.push_str(&buffered);
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_strip_line_comments() {
        let json = strip_jsonc("{\n  // a comment\n  \"a\": 1\n}");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_strip_block_comments() {
        let json = strip_jsonc("{ /* multi\nline */ \"a\": \"b\" }");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["a"], "b");
    }

    #[test]
    fn test_comment_markers_in_strings_survive() {
        let json = strip_jsonc(r#"{ "url": "https://example.com/*x*/", "p": "a//b" }"#);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["url"], "https://example.com/*x*/");
        assert_eq!(value["p"], "a//b");
    }

    #[test]
    fn test_strip_trailing_commas() {
        let json = strip_jsonc("{ \"a\": [1, 2, ], \"b\": { \"c\": 3, }, }");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["a"][1], 2);
        assert_eq!(value["b"]["c"], 3);
    }

    #[test]
    fn test_find_config_file_searches_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("packages/app/src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();

        let found = find_config_file(&nested, Path::new("tsconfig.json")).unwrap();
        assert_eq!(found, dir.path().join("tsconfig.json"));

        assert!(find_config_file(&nested, Path::new("tsconfig.missing.json")).is_none());
    }

    #[test]
    fn test_load_plain_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{
  "compilerOptions": {
    // where output goes
    "outDir": "lib",
    "target": "ES2021",
    "sourceMap": true,
  },
  "include": ["src"],
}"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/index.ts"), "export {};").unwrap();

        let config = TsConfig::load(dir.path(), Path::new("tsconfig.json")).unwrap();
        assert_eq!(
            config.compiler_options.out_dir.as_deref(),
            Some(Path::new("lib"))
        );
        assert_eq!(config.compiler_options.target.as_deref(), Some("ES2021"));
        assert_eq!(config.compiler_options.source_map, Some(true));
        assert_eq!(config.file_names, vec![dir.path().join("src/index.ts")]);
    }

    #[test]
    fn test_extends_chain_merges() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.base.json"),
            r#"{ "compilerOptions": { "target": "es5", "sourceMap": true } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": "./tsconfig.base", "compilerOptions": { "target": "es2020" } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("main.ts"), "export {};").unwrap();

        let config = TsConfig::load(dir.path(), Path::new("tsconfig.json")).unwrap();
        // Child target wins, base sourceMap inherited
        assert_eq!(config.compiler_options.target.as_deref(), Some("es2020"));
        assert_eq!(config.compiler_options.source_map, Some(true));
    }

    #[test]
    fn test_extends_through_node_modules() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("node_modules/@tsconfig/strict");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("tsconfig.json"),
            r#"{ "compilerOptions": { "target": "es2022" } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": "@tsconfig/strict" }"#,
        )
        .unwrap();
        fs::write(dir.path().join("main.ts"), "export {};").unwrap();

        let config = TsConfig::load(dir.path(), Path::new("tsconfig.json")).unwrap();
        assert_eq!(config.compiler_options.target.as_deref(), Some("es2022"));
    }

    #[test]
    fn test_extends_cycle_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{ "extends": "./b.json" }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{ "extends": "./a.json" }"#,
        )
        .unwrap();

        let err = TsConfig::load(dir.path(), Path::new("a.json")).unwrap_err();
        assert!(err.to_string().contains("extends chain"));
    }

    #[test]
    fn test_missing_tsconfig_errors() {
        let dir = TempDir::new().unwrap();
        let err = TsConfig::load(dir.path(), Path::new("tsconfig.json")).unwrap_err();
        assert!(matches!(err, TsBuildError::TsConfigNotFound { .. }));
    }

    #[test]
    fn test_malformed_tsconfig_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{ not json ").unwrap();
        let err = TsConfig::load(dir.path(), Path::new("tsconfig.json")).unwrap_err();
        assert!(matches!(err, TsBuildError::TsConfig { .. }));
    }
}
