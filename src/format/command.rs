//! Formatter that delegates to an external Go tool.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use super::Formatter;
use crate::error::{GenError, Result};

/// Pipes source through a command such as `gofmt` or `goimports`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn error(&self, unit: &str, message: impl Into<String>) -> GenError {
        GenError::Format {
            name: unit.to_string(),
            message: format!("{}: {}", self.program, message.into()),
        }
    }
}

impl Formatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, unit: &str, source: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.error(unit, format!("cannot run: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.error(unit, "stdin unavailable"))?;
        let input = source.to_string();
        // Feed stdin from another thread so a full stdout pipe cannot block us.
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| self.error(unit, e.to_string()))?;
        let written = writer.join();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.error(unit, stderr.trim().to_string()));
        }
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(self.error(unit, format!("writing input: {}", e))),
            Err(_) => return Err(self.error(unit, "input writer panicked")),
        }
        String::from_utf8(output.stdout).map_err(|e| self.error(unit, e.to_string()))
    }
}
