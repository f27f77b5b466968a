//! Source walker: turns a directory of Go files into parsed packages.
//!
//! This module provides:
//! - `ParsedFile`: a tree-sitter tree together with its source bytes
//! - `SourcePackage`: the files of one package, in sorted path order
//! - `load_packages`: directory walking, parsing and grouping by package

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{GenError, Result};

pub mod go;

pub use go::GoParser;

/// Holds a parsed tree-sitter tree and associated metadata.
#[derive(Debug)]
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: PathBuf,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Get the source text between two byte offsets.
    pub fn source_text(&self, start: usize, end: usize) -> &str {
        self.source
            .get(start..end)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }
}

/// One import declared by a source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ImportSpec {
    /// Explicit package name, `.` or `_`.
    pub alias: Option<String>,
    /// Import path without quotes.
    pub path: String,
}

impl ImportSpec {
    /// Name under which the import is referenced in code.
    ///
    /// Returns None for dot and blank imports, which are never referenced
    /// through a qualifier.
    pub fn package_name(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some(".") | Some("_") => None,
            Some(alias) => Some(alias),
            None => {
                let mut segments = self.path.rsplit('/');
                let last = segments.next().unwrap_or(&self.path);
                // Major version suffixes (`/v2`) are not part of the name.
                if is_major_version(last) {
                    segments.next().or(Some(last))
                } else {
                    Some(last)
                }
            }
        }
    }
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

/// All parsed files that declare the same package in the same directory.
#[derive(Debug)]
pub struct SourcePackage {
    /// Package name from the package clause.
    pub name: String,
    /// Directory holding the package's files.
    pub dir: PathBuf,
    /// Parsed files, sorted by path.
    pub files: Vec<ParsedFile>,
    /// Imports of all files, sorted and deduplicated.
    pub imports: Vec<ImportSpec>,
}

/// Options controlling which files the walker picks up.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Include `_test.go` files.
    pub include_test_files: bool,
    /// Paths (relative to the root) to skip.
    pub excluded: Option<GlobSet>,
}

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata", "node_modules"];

/// Collect the Go files under `root` that `options` selects, sorted by path.
pub fn collect_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root)
        .map_err(|e| GenError::InvalidTarget(format!("cannot access {}: {}", root.display(), e)))?;
    if !metadata.is_dir() {
        return Err(GenError::InvalidTarget(format!(
            "{:?} is not a directory",
            root
        )));
    }

    let mut walker = WalkDir::new(root).follow_links(true);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| {
        if e.depth() == 0 || !e.file_type().is_dir() {
            return true;
        }
        let name = e.file_name().to_string_lossy();
        !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
    }) {
        let entry = entry.map_err(|e| GenError::InvalidTarget(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !options.include_test_files && name.ends_with("_test.go") {
            continue;
        }
        if let Some(excluded) = &options.excluded {
            let relative = path.strip_prefix(root).unwrap_or(path);
            if excluded.is_match(relative) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Parse every selected Go file under `root` and group them by package.
///
/// Packages are ordered by directory, then by package name.
pub fn load_packages(root: &Path, options: &WalkOptions) -> Result<Vec<SourcePackage>> {
    let files = collect_files(root, options)?;
    let parser = GoParser::new()?;

    let mut packages: BTreeMap<(PathBuf, String), SourcePackage> = BTreeMap::new();
    for path in files {
        let source = fs::read(&path).map_err(|e| GenError::parse(&path, e.to_string()))?;
        let parsed = parser.parse(&path, source)?;
        let name = parser
            .package_name(&parsed)
            .ok_or_else(|| GenError::parse(&path, "missing package clause"))?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let imports = parser.imports(&parsed);

        let package = packages
            .entry((dir.clone(), name.clone()))
            .or_insert_with(|| SourcePackage {
                name,
                dir,
                files: Vec::new(),
                imports: Vec::new(),
            });
        package.files.push(parsed);
        package.imports.extend(imports);
    }

    let mut packages: Vec<SourcePackage> = packages.into_values().collect();
    for package in &mut packages {
        package.imports.sort();
        package.imports.dedup();
    }

    tracing::debug!(root = %root.display(), count = packages.len(), "loaded packages");
    Ok(packages)
}

/// Parse a single in-memory source file as a package.
pub fn parse_source(path: impl AsRef<Path>, source: &str) -> Result<SourcePackage> {
    let path = path.as_ref();
    let parser = GoParser::new()?;
    let parsed = parser.parse(path, source.as_bytes().to_vec())?;
    let name = parser
        .package_name(&parsed)
        .ok_or_else(|| GenError::parse(path, "missing package clause"))?;
    let mut imports = parser.imports(&parsed);
    imports.sort();
    imports.dedup();
    Ok(SourcePackage {
        name,
        dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        files: vec![parsed],
        imports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_import_package_name() {
        let plain = ImportSpec { alias: None, path: "net/http".into() };
        assert_eq!(plain.package_name(), Some("http"));

        let versioned = ImportSpec { alias: None, path: "github.com/x/mod/v2".into() };
        assert_eq!(versioned.package_name(), Some("mod"));

        let aliased = ImportSpec { alias: Some("y".into()), path: "gopkg.in/yaml.v3".into() };
        assert_eq!(aliased.package_name(), Some("y"));

        let blank = ImportSpec { alias: Some("_".into()), path: "embed".into() };
        assert_eq!(blank.package_name(), None);
    }

    #[test]
    fn test_load_packages_groups_by_package() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.go", "package shapes\n\ntype B struct{ x int }\n");
        write(temp.path(), "a.go", "package shapes\n\nimport \"time\"\n\ntype A struct{ t time.Time }\n");
        write(temp.path(), "a_test.go", "package shapes_test\n");
        write(temp.path(), "notes.txt", "not go");

        let packages = load_packages(temp.path(), &WalkOptions::default()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "shapes");
        let names: Vec<_> = packages[0]
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
        assert_eq!(packages[0].imports.len(), 1);
    }

    #[test]
    fn test_load_packages_includes_tests_when_asked() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.go", "package shapes\n");
        write(temp.path(), "a_test.go", "package shapes_test\n");

        let options = WalkOptions {
            include_test_files: true,
            ..Default::default()
        };
        let packages = load_packages(temp.path(), &options).unwrap();
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["shapes", "shapes_test"]);
    }

    #[test]
    fn test_recursive_walk_skips_vendor() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "root.go", "package root\n");
        write(temp.path(), "sub/sub.go", "package sub\n");
        write(temp.path(), "vendor/dep/dep.go", "package dep\n");

        let flat = load_packages(temp.path(), &WalkOptions::default()).unwrap();
        assert_eq!(flat.len(), 1);

        let options = WalkOptions {
            recursive: true,
            ..Default::default()
        };
        let deep = load_packages(temp.path(), &options).unwrap();
        let names: Vec<_> = deep.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["root", "sub"]);
    }

    #[test]
    fn test_missing_directory_is_invalid_target() {
        let temp = TempDir::new().unwrap();
        let err = load_packages(&temp.path().join("nope"), &WalkOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.stage(), "config");
    }

    #[test]
    fn test_file_target_is_invalid_target() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.go", "package a\n");
        let err = load_packages(&temp.path().join("a.go"), &WalkOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, GenError::InvalidTarget(_)));
    }

    #[test]
    fn test_broken_file_aborts() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.go", "package a\n\ntype A struct {\n");
        let err = load_packages(temp.path(), &WalkOptions::default()).err().unwrap();
        assert_eq!(err.stage(), "parse");
    }
}
