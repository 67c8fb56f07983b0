//! Input resolution: a user-supplied path → [`InputSource`].
//!
//! The path is classified once, here, as a single PubTator file or a
//! directory of them. Everything downstream works on decoded text and never
//! touches the filesystem to decide what kind of input it has.

use crate::error::AnndocError;
use crate::pipeline::sink::HTML_EXTENSION;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The resolved input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// One PubTator file, possibly holding many records.
    SingleFile(PathBuf),
    /// A directory; every regular, non-hidden, non-artifact file is read.
    Directory(PathBuf),
}

impl InputSource {
    /// Classify `path`, validating that it exists and is readable.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self, AnndocError> {
        let path = path.as_ref().to_path_buf();
        let meta = std::fs::metadata(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => AnndocError::PermissionDenied { path: path.clone() },
            _ => AnndocError::FileNotFound { path: path.clone() },
        })?;

        if meta.is_dir() {
            debug!("Resolved input directory: {}", path.display());
            Ok(InputSource::Directory(path))
        } else {
            debug!("Resolved input file: {}", path.display());
            Ok(InputSource::SingleFile(path))
        }
    }

    /// The directory artifacts go to when no output directory is configured.
    pub fn default_output_dir(&self) -> PathBuf {
        match self {
            InputSource::Directory(dir) => dir.clone(),
            InputSource::SingleFile(file) => match file.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }

    /// The files to convert, in name order.
    pub fn files(&self) -> Result<Vec<PathBuf>, AnndocError> {
        match self {
            InputSource::SingleFile(file) => Ok(vec![file.clone()]),
            InputSource::Directory(dir) => {
                let entries = std::fs::read_dir(dir).map_err(|e| AnndocError::MalformedInput {
                    path: dir.clone(),
                    detail: e.to_string(),
                })?;
                let mut files = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|e| AnndocError::MalformedInput {
                        path: dir.clone(),
                        detail: e.to_string(),
                    })?;
                    let path = entry.path();
                    if path.is_file() && is_pubtator_candidate(&path) {
                        files.push(path);
                    }
                }
                files.sort();
                Ok(files)
            }
        }
    }
}

/// Skip hidden files and artifacts from earlier runs (output defaults to
/// the input directory).
fn is_pubtator_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !(name.starts_with('.')
        || path
            .extension()
            .is_some_and(|ext| ext == HTML_EXTENSION || ext == "json"))
}

/// Read a PubTator file and decode it as text.
pub fn read_blob(path: &Path) -> Result<String, AnndocError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AnndocError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => AnndocError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => AnndocError::MalformedInput {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })?;
    decode_blob(&bytes).map_err(|detail| AnndocError::MalformedInput {
        path: path.to_path_buf(),
        detail,
    })
}

/// Decode UTF-8, drop a leading BOM and normalise line endings to LF.
pub fn decode_blob(bytes: &[u8]) -> Result<String, String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| format!("not valid UTF-8: {e}"))?;
    Ok(normalise_text(text))
}

/// Drop a leading BOM and normalise CRLF and CR line endings to LF.
pub fn normalise_text(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    normalise_line_endings(text)
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn decode_strips_bom_and_crlf() {
        let text = decode_blob(b"\xEF\xBB\xBF1|t|T\r\n1|a|A\r\n").unwrap();
        assert_eq!(text, "1|t|T\n1|a|A\n");
    }

    #[test]
    fn normalise_handles_lone_cr() {
        assert_eq!(normalise_text("\u{FEFF}1|t|T\r1|a|A\r\r"), "1|t|T\n1|a|A\n\n");
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let err = decode_blob(&[0x31, 0xFF, 0xFE]).unwrap_err();
        assert!(err.contains("UTF-8"));
    }

    #[test]
    fn resolve_missing_path() {
        let err = InputSource::resolve("/definitely/not/here.PubTator").unwrap_err();
        assert!(matches!(err, AnndocError::FileNotFound { .. }));
    }

    #[test]
    fn resolve_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sample.PubTator");
        std::fs::write(&file, "1|t|T\n1|a|A\n").unwrap();

        let single = InputSource::resolve(&file).unwrap();
        assert_eq!(single, InputSource::SingleFile(file.clone()));
        assert_eq!(single.default_output_dir(), dir.path());

        let directory = InputSource::resolve(dir.path()).unwrap();
        assert_eq!(directory.default_output_dir(), dir.path());
    }

    #[test]
    fn directory_listing_skips_artifacts_and_hidden_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.txt", "a.PubTator", "1.html", "1.ann.json", ".hidden"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let files = InputSource::Directory(dir.path().to_path_buf()).files().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PubTator", "b.txt"]);
    }

    #[test]
    fn read_blob_reports_malformed_input() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bad.PubTator");
        std::fs::write(&file, [0xC3, 0x28]).unwrap();
        let err = read_blob(&file).unwrap_err();
        assert!(matches!(err, AnndocError::MalformedInput { .. }));
    }
}
