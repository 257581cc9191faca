//! Ensure output directories exist and write formatted artifacts into them.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use fmtwrite::{FormatKind, Toolchain, WriteOptions, ensure_dir, save_file};
//!
//! # fn main() -> Result<(), fmtwrite::OutputError> {
//! let out_dir = Utf8Path::new("generated");
//! ensure_dir(out_dir)?;
//! let path = save_file(
//!     &Toolchain::default(),
//!     out_dir,
//!     "schema.json",
//!     r#"{"a":1}"#,
//!     &WriteOptions::new(FormatKind::Json),
//! )?;
//! assert_eq!(path, out_dir.join("schema.json"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod output;

pub use error::{FormatError, OutputError};
pub use format::{
    DEFAULT_PRINT_WIDTH, FormatKind, Formatter, JsonFormatter, PrettierFormatter, Toolchain,
};
pub use output::{CURRENT_DIR, WriteOptions, ensure_dir, is_current_dir, join_artifact, save_file};
