//! Output sinks for generated code.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{GenError, Result};
use crate::extract::PackageResult;
use crate::pipeline::PackageOutput;

/// Where generated text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Print to standard output.
    #[default]
    Stdout,
    /// Write `<package>_getters_and_setters.go` into the package directory.
    PackageFile,
}

/// Emit one package's output.
///
/// Returns the written path in `PackageFile` mode.
pub fn write_output<W: Write>(
    output: &PackageOutput,
    mode: WriteMode,
    stdout: &mut W,
) -> Result<Option<PathBuf>> {
    match mode {
        WriteMode::Stdout => {
            writeln!(stdout, "{}", output.text)
                .and_then(|_| stdout.flush())
                .map_err(|source| GenError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            Ok(None)
        }
        WriteMode::PackageFile => {
            let path = output.dir.join(output.file_name());
            fs::write(&path, &output.text).map_err(|source| GenError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), types = output.types.len(), "wrote accessors");
            Ok(Some(path))
        }
    }
}

/// Print extraction results as pretty JSON.
pub fn write_json<W: Write>(results: &[PackageResult], stdout: &mut W) -> Result<()> {
    let json = serde_json::to_string_pretty(results)
        .map_err(|e| GenError::Render(format!("cannot serialize results: {}", e)))?;
    writeln!(stdout, "{}", json).map_err(|source| GenError::Write {
        path: PathBuf::from("<stdout>"),
        source,
    })
}
