use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::core::error::{GroupsError, Result};

/// An external style formatter the regrouped source is piped through.
///
/// A failing formatter must report the failure; callers never fall back to
/// the unformatted text.
pub trait StyleFormatter {
    fn format(&self, source: &str) -> Result<String>;
}

impl<F> StyleFormatter for F
where
    F: Fn(&str) -> Result<String>,
{
    fn format(&self, source: &str) -> Result<String> {
        self(source)
    }
}

/// Runs a formatter command, feeding the source on stdin and reading the
/// formatted result from stdout. `gofmt` by default.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn gofmt() -> Self {
        Self::new("gofmt", Vec::new())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn failure(&self, message: impl Into<String>) -> GroupsError {
        GroupsError::FormatterFailure {
            program: self.program.clone(),
            message: message.into(),
        }
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::gofmt()
    }
}

impl StyleFormatter for CommandFormatter {
    fn format(&self, source: &str) -> Result<String> {
        debug!(program = %self.program, "running style formatter");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("could not start: {e}")))?;

        // The formatter may fill stdout before it drains stdin.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("stdin was not captured"))?;
        let input = source.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer.join();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(stderr.trim().to_string()));
        }
        match written {
            Ok(result) => result?,
            Err(_) => return Err(self.failure("stdin writer panicked")),
        }
        String::from_utf8(output.stdout)
            .map_err(|e| self.failure(format!("produced invalid UTF-8: {e}")))
    }
}
