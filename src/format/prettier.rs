use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use super::{FormatKind, Formatter};
use crate::error::FormatError;

const DEFAULT_COMMAND: &str = "prettier";

/// Formats text by piping it through an external `prettier` process.
#[derive(Clone, Debug)]
pub struct PrettierFormatter {
    command: Vec<String>,
}

impl Default for PrettierFormatter {
    fn default() -> Self {
        Self {
            command: vec![DEFAULT_COMMAND.to_owned()],
        }
    }
}

impl PrettierFormatter {
    /// `command` is the program followed by any leading arguments, e.g.
    /// `["npx", "prettier"]`. An empty command falls back to `prettier`.
    pub fn new(command: Vec<String>) -> Self {
        if command.is_empty() {
            return Self::default();
        }
        Self { command }
    }

    pub fn program(&self) -> &str {
        &self.command[0]
    }
}

impl Formatter for PrettierFormatter {
    fn format(
        &self,
        contents: &str,
        kind: FormatKind,
        print_width: usize,
    ) -> Result<String, FormatError> {
        let program = self.program().to_owned();
        debug!(%program, parser = kind.parser(), print_width, "running prettier");

        let mut child = Command::new(&program)
            .args(&self.command[1..])
            .args(["--parser", kind.parser()])
            .arg("--print-width")
            .arg(print_width.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FormatError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a large output cannot block the write.
        let mut stdin = child.stdin.take().ok_or_else(|| {
            FormatError::Io(std::io::Error::other("formatter stdin was not captured"))
        })?;
        let input = contents.to_owned();
        let feeder = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| FormatError::Io(std::io::Error::other("stdin feeder panicked")))?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        fed?;

        Ok(String::from_utf8(output.stdout)?)
    }
}
