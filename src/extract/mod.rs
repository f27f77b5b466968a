//! Extraction engine.
//!
//! Consumes scanner records and builds the derived model of a package:
//! an `InterfaceSet` in interface mode, or a sequence of `AccessorGroup`s
//! in accessor mode.

mod accessor;
mod interface;

pub use accessor::{generate_accessors, receiver_name, AccessorGroup, AccessorPair};
pub use interface::{extract_interfaces, InterfaceSet, InterfaceSpec, DEFAULT_INTERFACE_SUFFIX};

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::parser::{ImportSpec, SourcePackage};
use crate::scan::{scan_package, TypeFilter};

/// What the generator derives from each package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// One interface per type, listing its method set.
    InterfaceExtraction,
    /// A getter and a setter per struct field.
    AccessorGeneration,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::InterfaceExtraction => "interface-extraction",
            Mode::AccessorGeneration => "accessor-generation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The derived model of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "types", rename_all = "snake_case")]
pub enum Extracted {
    Interfaces(InterfaceSet),
    Accessors(Vec<AccessorGroup>),
}

impl Extracted {
    pub fn is_empty(&self) -> bool {
        match self {
            Extracted::Interfaces(set) => set.is_empty(),
            Extracted::Accessors(groups) => groups.is_empty(),
        }
    }

    /// Names of the source types that produced output, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match self {
            Extracted::Interfaces(set) => set
                .specs
                .values()
                .map(|s| s.original_type_name.as_str())
                .collect(),
            Extracted::Accessors(groups) => {
                groups.iter().map(|g| g.owner_type_name.as_str()).collect()
            }
        };
        names.sort_unstable();
        names
    }
}

/// Extraction result for one source package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResult {
    pub package: String,
    pub dir: PathBuf,
    /// Imports of the source package, used to resolve qualified field types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportSpec>,
    pub extracted: Extracted,
}

/// Options for the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub mode: Mode,
    pub filter: TypeFilter,
    pub interface_suffix: String,
}

impl ExtractOptions {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            filter: TypeFilter::All,
            interface_suffix: DEFAULT_INTERFACE_SUFFIX.to_string(),
        }
    }
}

/// Scan a package and build its derived model.
pub fn extract_package(package: &SourcePackage, options: &ExtractOptions) -> Result<PackageResult> {
    let records = scan_package(package, &options.filter);

    let (extracted, imports) = match options.mode {
        Mode::InterfaceExtraction => (
            Extracted::Interfaces(extract_interfaces(
                &records.methods,
                &options.interface_suffix,
            )),
            Vec::new(),
        ),
        Mode::AccessorGeneration => (
            Extracted::Accessors(generate_accessors(&records.structs)?),
            package.imports.clone(),
        ),
    };

    Ok(PackageResult {
        package: package.name.clone(),
        dir: package.dir.clone(),
        imports,
        extracted,
    })
}
