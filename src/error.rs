//! Error taxonomy for the generation pipeline.
//!
//! Every variant is fatal for the run. The CLI reports the stage and the
//! cause and exits non-zero.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating code.
#[derive(Error, Debug)]
pub enum GenError {
    /// The target directory, type filter, or configuration is unusable.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A source file could not be read or does not parse.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// An internal invariant of the extraction engine was violated.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Template synthesis failed.
    #[error("render error: {0}")]
    Render(String),

    /// The formatter rejected the generated text.
    #[error("format error in {name}: {message}")]
    Format { name: String, message: String },

    /// The output sink failed.
    #[error("write error for {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            GenError::InvalidTarget(_) => "config",
            GenError::Parse { .. } => "parse",
            GenError::Extraction(_) => "extract",
            GenError::Render(_) => "render",
            GenError::Format { .. } => "format",
            GenError::Write { .. } => "write",
        }
    }

    pub(crate) fn parse<P: Into<PathBuf>>(path: P, message: impl Into<String>) -> Self {
        GenError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for GenError {
    fn from(e: std::fmt::Error) -> Self {
        GenError::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(GenError::InvalidTarget("x".into()).stage(), "config");
        assert_eq!(GenError::parse("a.go", "bad").stage(), "parse");
        assert_eq!(GenError::Extraction("x".into()).stage(), "extract");
        assert_eq!(GenError::from(std::fmt::Error).stage(), "render");
    }

    #[test]
    fn test_display_includes_cause() {
        let err = GenError::parse("pkg/a.go", "unexpected token at 3:1");
        let msg = err.to_string();
        assert!(msg.contains("pkg/a.go"));
        assert!(msg.contains("3:1"));
    }
}
