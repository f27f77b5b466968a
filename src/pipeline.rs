//! Generation pipeline that runs every stage for each package.
//!
//! ```text
//! SourcePackage ──scan──▶ records ──extract──▶ PackageResult
//!                                                   │
//!                          formatted text ◀─format── rendered text
//! ```

use std::path::PathBuf;

use rayon::prelude::*;

use crate::error::Result;
use crate::extract::{extract_package, ExtractOptions, Mode, PackageResult};
use crate::format::{BuiltinFormatter, Formatter};
use crate::parser::SourcePackage;
use crate::render::{RenderOptions, Renderer};
use crate::scan::TypeFilter;

/// Formatted output for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutput {
    pub package: String,
    pub dir: PathBuf,
    pub mode: Mode,
    /// Source types that contributed to the output, sorted.
    pub types: Vec<String>,
    pub text: String,
}

impl PackageOutput {
    /// File name used when writing accessors next to the package.
    pub fn file_name(&self) -> String {
        format!("{}_getters_and_setters.go", self.package)
    }
}

/// Runs scan, extraction, rendering and formatting for packages.
pub struct Generator {
    extract: ExtractOptions,
    renderer: Renderer,
    formatter: Box<dyn Formatter>,
    parallel: bool,
}

impl Generator {
    /// Create a generator for `mode` with the builtin formatter.
    pub fn new(mode: Mode) -> Self {
        Self {
            extract: ExtractOptions::new(mode),
            renderer: Renderer::new(RenderOptions::default()),
            formatter: Box::new(BuiltinFormatter::new()),
            parallel: false,
        }
    }

    /// Restrict generation to the given types.
    pub fn filter(mut self, filter: TypeFilter) -> Self {
        self.extract.filter = filter;
        self
    }

    /// Set the suffix of derived interface names.
    pub fn interface_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.extract.interface_suffix = suffix.into();
        self
    }

    /// Set the renderer options.
    pub fn render_options(mut self, options: RenderOptions) -> Self {
        self.renderer = Renderer::new(options);
        self
    }

    /// Set the formatter.
    pub fn formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Process packages on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn mode(&self) -> Mode {
        self.extract.mode
    }

    pub fn type_filter(&self) -> &TypeFilter {
        &self.extract.filter
    }

    /// Build the derived model of one package.
    pub fn extract(&self, package: &SourcePackage) -> Result<PackageResult> {
        extract_package(package, &self.extract)
    }

    /// Render and format an extraction result.
    ///
    /// Returns None when the package has nothing to generate.
    pub fn render(&self, result: &PackageResult) -> Result<Option<PackageOutput>> {
        if result.extracted.is_empty() {
            tracing::debug!(package = %result.package, "nothing to generate");
            return Ok(None);
        }

        let rendered = self.renderer.render(result)?;
        let unit = match self.extract.mode {
            Mode::InterfaceExtraction => format!("{}_interfaces.go", result.package),
            Mode::AccessorGeneration => format!("{}_getters_and_setters.go", result.package),
        };
        let text = self.formatter.format(&unit, &rendered)?;

        tracing::debug!(
            package = %result.package,
            formatter = self.formatter.name(),
            bytes = text.len(),
            "rendered package"
        );

        Ok(Some(PackageOutput {
            package: result.package.clone(),
            dir: result.dir.clone(),
            mode: self.extract.mode,
            types: result
                .extracted
                .type_names()
                .into_iter()
                .map(String::from)
                .collect(),
            text,
        }))
    }

    /// Run every stage for one package.
    pub fn generate(&self, package: &SourcePackage) -> Result<Option<PackageOutput>> {
        let result = self.extract(package)?;
        self.render(&result)
    }

    /// Extract every package, in package order.
    pub fn extract_all(&self, packages: Vec<SourcePackage>) -> Vec<Result<PackageResult>> {
        if self.parallel {
            packages.into_par_iter().map(|p| self.extract(&p)).collect()
        } else {
            packages.into_iter().map(|p| self.extract(&p)).collect()
        }
    }

    /// Generate every package, in package order.
    ///
    /// Each entry fails or succeeds on its own; callers stop at the first
    /// error so that packages before it are still emitted.
    pub fn generate_all(&self, packages: Vec<SourcePackage>) -> Vec<Result<Option<PackageOutput>>> {
        if self.parallel {
            packages.into_par_iter().map(|p| self.generate(&p)).collect()
        } else {
            packages.into_iter().map(|p| self.generate(&p)).collect()
        }
    }
}
