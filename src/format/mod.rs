//! Formatters canonicalize rendered Go text.
//!
//! Two implementations are available:
//! - `BuiltinFormatter`: validates the text with tree-sitter and normalizes
//!   indentation and blank lines, no external tools required
//! - `CommandFormatter`: pipes the text through `gofmt` or `goimports`

mod builtin;
mod command;

pub use builtin::{reindent, BuiltinFormatter};
pub use command::CommandFormatter;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canonicalizes generated source text.
pub trait Formatter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Format `source`; `unit` names the output for diagnostics.
    ///
    /// Fails when `source` is not syntactically valid.
    fn format(&self, unit: &str, source: &str) -> Result<String>;
}

/// Which formatter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    #[default]
    Builtin,
    Gofmt,
    Goimports,
}

impl FormatterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatterKind::Builtin => "builtin",
            FormatterKind::Gofmt => "gofmt",
            FormatterKind::Goimports => "goimports",
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create the formatter for `kind`.
pub fn for_kind(kind: FormatterKind) -> Box<dyn Formatter> {
    match kind {
        FormatterKind::Builtin => Box::new(BuiltinFormatter::new()),
        FormatterKind::Gofmt => Box::new(CommandFormatter::new("gofmt", &[])),
        FormatterKind::Goimports => Box::new(CommandFormatter::new("goimports", &[])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_kind() {
        assert_eq!(for_kind(FormatterKind::Builtin).name(), "builtin");
        assert_eq!(for_kind(FormatterKind::Gofmt).name(), "gofmt");
        assert_eq!(for_kind(FormatterKind::Goimports).name(), "goimports");
    }

    #[test]
    fn test_kind_from_yaml() {
        let kind: FormatterKind = serde_yaml::from_str("goimports").unwrap();
        assert_eq!(kind, FormatterKind::Goimports);
        assert_eq!(FormatterKind::default(), FormatterKind::Builtin);
    }
}
