pub mod json;
pub mod prettier;

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::FormatError;

pub use json::JsonFormatter;
pub use prettier::PrettierFormatter;

/// Line width formatters aim for when the caller does not pick one.
pub const DEFAULT_PRINT_WIDTH: usize = 80;

/// Ruleset applied to text before it is written.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormatKind {
    /// Structured data.
    #[default]
    #[value(name = "json")]
    #[serde(rename = "json")]
    Json,
    /// Source code.
    #[value(name = "typescript", alias = "ts")]
    #[serde(rename = "typescript", alias = "ts")]
    TypeScript,
}

impl FormatKind {
    /// Parser name understood by prettier.
    pub fn parser(&self) -> &'static str {
        match self {
            FormatKind::Json => "json",
            FormatKind::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parser())
    }
}

/// Turns raw text into formatted text for a given [`FormatKind`].
pub trait Formatter {
    fn format(
        &self,
        contents: &str,
        kind: FormatKind,
        print_width: usize,
    ) -> Result<String, FormatError>;
}

impl<F> Formatter for F
where
    F: Fn(&str, FormatKind, usize) -> Result<String, FormatError>,
{
    fn format(
        &self,
        contents: &str,
        kind: FormatKind,
        print_width: usize,
    ) -> Result<String, FormatError> {
        self(contents, kind, print_width)
    }
}

/// Routes structured data to the built-in JSON formatter and everything else
/// to prettier.
#[derive(Clone, Debug, Default)]
pub struct Toolchain {
    json: JsonFormatter,
    prettier: PrettierFormatter,
    json_via_prettier: bool,
}

impl Toolchain {
    pub fn new(prettier: PrettierFormatter) -> Self {
        Self {
            json: JsonFormatter,
            prettier,
            json_via_prettier: false,
        }
    }

    /// Send JSON through prettier as well instead of formatting it in-process.
    pub fn json_via_prettier(mut self, enabled: bool) -> Self {
        self.json_via_prettier = enabled;
        self
    }
}

impl Formatter for Toolchain {
    fn format(
        &self,
        contents: &str,
        kind: FormatKind,
        print_width: usize,
    ) -> Result<String, FormatError> {
        match kind {
            FormatKind::Json if !self.json_via_prettier => {
                self.json.format(contents, kind, print_width)
            }
            _ => self.prettier.format(contents, kind, print_width),
        }
    }
}
