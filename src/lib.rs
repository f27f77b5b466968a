//! structgen - Go interface extraction and accessor generation.
//!
//! structgen reads the Go package in a directory with tree-sitter and
//! produces one of two kinds of generated code:
//!
//! - interface extraction: an interface per type, named after the type plus
//!   a suffix, listing every method declared on it
//! - accessor generation: a getter and a chainable setter for every field of
//!   each struct
//!
//! # Architecture
//!
//! - `parser`: walks the target directory and parses Go files into packages
//! - `scan`: collects method signatures and struct fields from syntax trees
//! - `extract`: builds interfaces and accessor pairs from scanned records
//! - `render`: turns the derived model into Go text
//! - `format`: canonicalizes rendered text (builtin, `gofmt`, `goimports`)
//! - `pipeline`: runs the stages per package, optionally in parallel
//! - `output`: writes generated code to stdout, files, or JSON
//! - `config`: YAML project configuration
//! - `cli`: command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod logging;
pub mod naming;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod scan;

pub use config::Config;
pub use error::{GenError, Result};
pub use extract::{
    extract_package, AccessorGroup, AccessorPair, ExtractOptions, Extracted, InterfaceSet,
    InterfaceSpec, Mode, PackageResult,
};
pub use format::{Formatter, FormatterKind};
pub use parser::{load_packages, parse_source, SourcePackage, WalkOptions};
pub use pipeline::{Generator, PackageOutput};
pub use render::{RenderOptions, Renderer};
pub use scan::{FieldSpec, MethodSignature, ScanRecords, StructDecl, TypeFilter};
