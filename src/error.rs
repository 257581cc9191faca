use std::io;
use std::string::FromUtf8Error;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::format::FormatKind;

/// Failures surfaced by [`crate::ensure_dir`] and [`crate::save_file`].
///
/// Every variant keeps the underlying error as its `source` so callers can
/// inspect it unchanged.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("creating directory {path}")]
    CreateDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("formatting {path} as {kind}")]
    Format {
        path: Utf8PathBuf,
        kind: FormatKind,
        #[source]
        source: FormatError,
    },
    #[error("writing {path}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid {kind} input: {message}")]
    Syntax { kind: FormatKind, message: String },
    #[error("no formatter available for {0}")]
    Unsupported(FormatKind),
    #[error("starting formatter `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("talking to formatter process")]
    Io(#[from] io::Error),
    #[error("formatter `{program}` exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("formatter output is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

impl FormatError {
    pub fn syntax<S: Into<String>>(kind: FormatKind, message: S) -> Self {
        Self::Syntax {
            kind,
            message: message.into(),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_owned(),
    }
}
