//! Configuration file for structgen.
//!
//! An optional YAML file sets project defaults; command-line flags override
//! its values.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::extract::DEFAULT_INTERFACE_SUFFIX;
use crate::format::FormatterKind;
use crate::naming::is_identifier;
use crate::render::DEFAULT_BANNER;
use crate::scan::TypeFilter;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["structgen.yaml", ".structgen.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Types to generate for; empty means all.
    #[serde(default)]
    pub types: Vec<String>,
    /// Suffix of derived interface names (default: "Interface")
    #[serde(default)]
    pub interface_suffix: Option<String>,
    /// Whether to scan `_test.go` files (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns, relative to the target directory, of files to skip
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub formatter: Option<FormatterKind>,
    /// First line of generated accessor files
    #[serde(default)]
    pub banner: Option<String>,
    /// Whether to stamp accessor files with the generation time (default: true)
    #[serde(default)]
    pub timestamp: Option<bool>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GenError::InvalidTarget(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::parse_str(&content).map_err(|e| match e {
            GenError::InvalidTarget(msg) => {
                GenError::InvalidTarget(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse a config from YAML text.
    pub fn parse_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| GenError::InvalidTarget(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit config file, or the first default one in `dir`.
    ///
    /// A missing default file is not an error.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::parse_file(path)?, Some(path.to_path_buf())));
        }
        match discover(dir) {
            Some(path) => Ok((Self::parse_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if let Some(suffix) = &self.interface_suffix {
            if !suffix.is_empty() && !is_identifier(&format!("X{}", suffix)) {
                return Err(GenError::InvalidTarget(format!(
                    "interface_suffix {:?} cannot be part of a type name",
                    suffix
                )));
            }
        }
        if let Some(banner) = &self.banner {
            if banner.contains('\n') {
                return Err(GenError::InvalidTarget(
                    "banner must be a single line".to_string(),
                ));
            }
        }
        self.type_filter()?;
        self.excluded_globs()?;
        Ok(())
    }

    /// The type filter described by `types`.
    pub fn type_filter(&self) -> Result<TypeFilter> {
        TypeFilter::from_names(&self.types)
    }

    /// Returns the interface suffix (defaults to "Interface").
    pub fn interface_suffix(&self) -> &str {
        self.interface_suffix
            .as_deref()
            .unwrap_or(DEFAULT_INTERFACE_SUFFIX)
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Returns the banner (defaults to the built-in one).
    pub fn banner(&self) -> &str {
        self.banner.as_deref().unwrap_or(DEFAULT_BANNER)
    }

    /// Returns whether to write a timestamp (defaults to true).
    pub fn should_timestamp(&self) -> bool {
        self.timestamp.unwrap_or(true)
    }

    /// Returns the formatter kind (defaults to builtin).
    pub fn formatter(&self) -> FormatterKind {
        self.formatter.unwrap_or_default()
    }

    /// Compile `excluded_paths` into a glob set.
    pub fn excluded_globs(&self) -> Result<Option<GlobSet>> {
        if self.excluded_paths.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|e| {
                GenError::InvalidTarget(format!("invalid excluded path {:?}: {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| GenError::InvalidTarget(e.to_string()))?;
        Ok(Some(set))
    }
}

/// Find a default config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
