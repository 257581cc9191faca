use std::fs;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;

use crate::format::{FormatKind, PrettierFormatter, Toolchain};
use crate::output::WriteOptions;

/// Optional TOML document supplying defaults for the CLI.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmtConfig {
    pub format: Option<FormatKind>,
    pub print_width: Option<usize>,
    #[serde(default)]
    pub prettier: PrettierConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrettierConfig {
    /// Program and leading arguments, e.g. `["npx", "prettier"]`.
    pub command: Option<Vec<String>>,
    /// Format JSON with prettier instead of the built-in formatter.
    #[serde(default)]
    pub json: bool,
}

impl FmtConfig {
    /// Merge file values over built-in defaults; explicit overrides win.
    pub fn write_options(
        &self,
        format: Option<FormatKind>,
        print_width: Option<usize>,
    ) -> WriteOptions {
        let defaults = WriteOptions::default();
        WriteOptions {
            format: format.or(self.format).unwrap_or(defaults.format),
            print_width: print_width
                .or(self.print_width)
                .unwrap_or(defaults.print_width),
        }
    }

    pub fn toolchain(&self) -> Toolchain {
        let prettier = self
            .prettier
            .command
            .clone()
            .map(PrettierFormatter::new)
            .unwrap_or_default();
        Toolchain::new(prettier).json_via_prettier(self.prettier.json)
    }
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<FmtConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}
