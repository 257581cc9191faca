use std::fs;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::OutputError;
use crate::format::{DEFAULT_PRINT_WIDTH, FormatKind, Formatter};

/// Output directory value meaning "the current directory; create nothing".
pub const CURRENT_DIR: &str = "./";

/// How [`save_file`] formats an artifact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WriteOptions {
    pub format: FormatKind,
    pub print_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: FormatKind::Json,
            print_width: DEFAULT_PRINT_WIDTH,
        }
    }
}

impl WriteOptions {
    pub fn new(format: FormatKind) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_print_width(mut self, print_width: usize) -> Self {
        self.print_width = print_width;
        self
    }
}

/// Ensure `out_dir` exists, creating it recursively if needed.
///
/// [`CURRENT_DIR`] is left alone without touching the filesystem. Calling this
/// again on an existing directory is a no-op.
pub fn ensure_dir(out_dir: &Utf8Path) -> Result<(), OutputError> {
    if is_current_dir(out_dir) || out_dir.exists() {
        return Ok(());
    }

    debug!(path = %out_dir, "creating output directory");
    fs::create_dir_all(out_dir).map_err(|source| OutputError::CreateDir {
        path: out_dir.to_owned(),
        source,
    })
}

/// Whether `out_dir` is the [`CURRENT_DIR`] sentinel. Only the exact string
/// matches; `.` and `./sub` do not.
pub fn is_current_dir(out_dir: &Utf8Path) -> bool {
    out_dir.as_str() == CURRENT_DIR
}

/// Join `file_name` onto `out_dir` and resolve `.` and `..` lexically.
///
/// A root or prefix on `file_name` is dropped, so the result never discards
/// `out_dir`: `/tmp/out` + `/abs/a.json` is `/tmp/out/abs/a.json`, and `./` +
/// `a.json` is `a.json`. An empty result is `.`.
pub fn join_artifact(out_dir: &Utf8Path, file_name: &str) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    let file_parts = Utf8Path::new(file_name)
        .components()
        .filter(|part| !matches!(part, Utf8Component::Prefix(_) | Utf8Component::RootDir));

    for part in out_dir.components().chain(file_parts) {
        match part {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => parts.push(part),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    let mut joined = Utf8PathBuf::new();
    for part in parts {
        joined.push(part.as_str());
    }
    joined
}

/// Format `contents` and write it to `out_dir/file_name`, replacing any
/// existing file. Returns the path written.
///
/// Nothing is written when formatting fails.
pub fn save_file<F>(
    formatter: &F,
    out_dir: &Utf8Path,
    file_name: &str,
    contents: &str,
    options: &WriteOptions,
) -> Result<Utf8PathBuf, OutputError>
where
    F: Formatter + ?Sized,
{
    let output_path = join_artifact(out_dir, file_name);

    let formatted = formatter
        .format(contents, options.format, options.print_width)
        .map_err(|source| OutputError::Format {
            path: output_path.clone(),
            kind: options.format,
            source,
        })?;

    fs::write(&output_path, formatted.as_bytes()).map_err(|source| OutputError::Write {
        path: output_path.clone(),
        source,
    })?;
    debug!(path = %output_path, kind = %options.format, bytes = formatted.len(), "wrote artifact");

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::format::JsonFormatter;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    fn reject_source(contents: &str, kind: FormatKind, _: usize) -> Result<String, FormatError> {
        match kind {
            FormatKind::TypeScript => Err(FormatError::syntax(kind, "Unexpected token")),
            FormatKind::Json => Ok(contents.to_owned()),
        }
    }

    #[test]
    fn ensure_dir_creates_missing_ancestors() {
        let (_temp, root) = scratch();
        let target = root.join("a").join("b").join("c");

        ensure_dir(&target).unwrap();

        assert!(target.is_dir());
    }

    #[test]
    fn ensure_dir_is_idempotent_and_keeps_contents() {
        let (_temp, root) = scratch();
        let target = root.join("out");
        ensure_dir(&target).unwrap();
        fs::write(target.join("keep.json"), "{}\n").unwrap();

        ensure_dir(&target).unwrap();

        assert_eq!(fs::read_to_string(target.join("keep.json")).unwrap(), "{}\n");
        assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
    }

    #[test]
    fn only_the_exact_sentinel_is_current_dir() {
        assert!(is_current_dir(Utf8Path::new("./")));
        assert!(!is_current_dir(Utf8Path::new(".")));
        assert!(!is_current_dir(Utf8Path::new("")));
        assert!(!is_current_dir(Utf8Path::new("./missing")));
        assert!(!is_current_dir(Utf8Path::new(".//")));
    }

    #[test]
    fn dot_prefixed_paths_other_than_the_sentinel_are_created() {
        let (_temp, root) = scratch();
        let dotted = Utf8PathBuf::from(format!("{root}/./sub/"));

        assert!(!is_current_dir(&dotted));
        ensure_dir(&dotted).unwrap();

        assert!(root.join("sub").is_dir());
    }

    #[test]
    fn join_artifact_matches_node_path_join() {
        assert_eq!(join_artifact(Utf8Path::new("./"), "x.json"), Utf8Path::new("x.json"));
        assert_eq!(join_artifact(Utf8Path::new("out"), "x.json"), Utf8Path::new("out/x.json"));
        assert_eq!(join_artifact(Utf8Path::new("out/./a"), "b.ts"), Utf8Path::new("out/a/b.ts"));
        assert_eq!(join_artifact(Utf8Path::new("out"), "../x.json"), Utf8Path::new("x.json"));
        assert_eq!(join_artifact(Utf8Path::new(".."), "x.json"), Utf8Path::new("../x.json"));
        assert_eq!(join_artifact(Utf8Path::new(""), "x.json"), Utf8Path::new("x.json"));
        assert_eq!(join_artifact(Utf8Path::new("./"), "."), Utf8Path::new("."));
    }

    #[cfg(unix)]
    #[test]
    fn join_artifact_keeps_absolute_names_inside_out_dir() {
        assert_eq!(
            join_artifact(Utf8Path::new("/tmp/out"), "/abs/escape.json"),
            Utf8Path::new("/tmp/out/abs/escape.json")
        );
        assert_eq!(join_artifact(Utf8Path::new("/"), "../x.json"), Utf8Path::new("/x.json"));
    }

    #[test]
    fn ensure_dir_reports_blocking_file() {
        let (_temp, root) = scratch();
        let blocker = root.join("file");
        fs::write(&blocker, "x").unwrap();

        let err = ensure_dir(&blocker.join("child")).unwrap_err();

        match err {
            OutputError::CreateDir { path, .. } => assert_eq!(path, blocker.join("child")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn save_file_pretty_prints_json() {
        let (_temp, root) = scratch();

        let path = save_file(
            &JsonFormatter,
            &root,
            "data.json",
            r#"{"a":1}"#,
            &WriteOptions::default(),
        )
        .unwrap();

        assert_eq!(path, root.join("data.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ \"a\": 1 }\n");
    }

    #[test]
    fn save_file_honours_print_width() {
        let (_temp, root) = scratch();
        let options = WriteOptions::new(FormatKind::Json).with_print_width(10);

        let path = save_file(&JsonFormatter, &root, "w.json", r#"{"ab":12}"#, &options).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "{\n  \"ab\": 12\n}\n");
    }

    #[test]
    fn save_file_leaves_no_file_when_formatting_fails() {
        let (_temp, root) = scratch();
        let options = WriteOptions::new(FormatKind::TypeScript);

        let err = save_file(&reject_source, &root, "index.ts", "const = ;", &options).unwrap_err();

        assert!(matches!(
            err,
            OutputError::Format {
                kind: FormatKind::TypeScript,
                source: FormatError::Syntax { .. },
                ..
            }
        ));
        assert!(!root.join("index.ts").exists());
    }

    #[test]
    fn save_file_keeps_existing_file_when_formatting_fails() {
        let (_temp, root) = scratch();
        let target = root.join("index.ts");
        fs::write(&target, "export {};\n").unwrap();

        save_file(
            &reject_source,
            &root,
            "index.ts",
            "const = ;",
            &WriteOptions::new(FormatKind::TypeScript),
        )
        .unwrap_err();

        assert_eq!(fs::read_to_string(&target).unwrap(), "export {};\n");
    }

    #[test]
    fn save_file_overwrites_previous_output() {
        let (_temp, root) = scratch();
        let options = WriteOptions::default();

        save_file(&JsonFormatter, &root, "data.json", r#"{"first":[1,2,3]}"#, &options).unwrap();
        let path = save_file(&JsonFormatter, &root, "data.json", "[]", &options).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "[]\n");
    }

    #[test]
    fn save_file_writes_formatter_output_verbatim() {
        let (_temp, root) = scratch();
        let formatted = "line one\r\nline two without newline";
        let verbatim = |_: &str, _: FormatKind, _: usize| Ok::<_, FormatError>(formatted.to_owned());

        let path = save_file(&verbatim, &root, "raw.txt", "ignored", &WriteOptions::default())
            .unwrap();

        assert_eq!(fs::read(path).unwrap(), formatted.as_bytes());
    }

    #[test]
    fn save_file_reports_write_failure() {
        let (_temp, root) = scratch();
        let missing = root.join("not-created");

        let err = save_file(&JsonFormatter, &missing, "data.json", "{}", &WriteOptions::default())
            .unwrap_err();

        match err {
            OutputError::Write { path, source } => {
                assert_eq!(path, missing.join("data.json"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn save_file_writes_absolute_names_under_out_dir() {
        let (_temp, root) = scratch();
        let (_elsewhere, outside) = scratch();
        let escape = outside.join("escape.json");
        ensure_dir(&join_artifact(&root, outside.as_str())).unwrap();

        let path = save_file(&JsonFormatter, &root, escape.as_str(), "{}", &WriteOptions::default())
            .unwrap();

        assert!(path.starts_with(&root));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
        assert!(!escape.exists());
    }

    #[test]
    fn save_file_joins_onto_current_dir_sentinel() {
        let formatter = |_: &str, _: FormatKind, _: usize| -> Result<String, FormatError> {
            Err(FormatError::Unsupported(FormatKind::Json))
        };
        let err = save_file(
            &formatter,
            Utf8Path::new(CURRENT_DIR),
            "x.json",
            "{}",
            &WriteOptions::default(),
        )
        .unwrap_err();

        match err {
            OutputError::Format { path, .. } => assert_eq!(path, Utf8Path::new("x.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
