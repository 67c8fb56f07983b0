//! Artifact persistence: `<id>.html` and `<id>.ann.json`.
//!
//! Both files are first written in full to temporary files in the
//! destination directory, then renamed into place: JSON first, HTML last.
//! A failure before the renames leaves any earlier pair for the same id
//! untouched.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Extension of the HTML artifact.
pub const HTML_EXTENSION: &str = "html";

/// Suffix of the annotation artifact.
pub const JSON_SUFFIX: &str = ".ann.json";

/// Where a record's artifacts were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub html: PathBuf,
    pub json: PathBuf,
}

impl ArtifactPaths {
    pub fn for_document(dir: &Path, document_id: &str) -> Self {
        Self {
            html: dir.join(format!("{document_id}.{HTML_EXTENSION}")),
            json: dir.join(format!("{document_id}{JSON_SUFFIX}")),
        }
    }
}

/// Write both artifacts of one record into `dir`.
pub fn write_artifacts(
    dir: &Path,
    document_id: &str,
    html: &str,
    json: &str,
) -> Result<ArtifactPaths, RecordError> {
    let paths = ArtifactPaths::for_document(dir, document_id);
    let sink_err = |path: &Path, e: std::io::Error| RecordError::SinkIo {
        id: document_id.to_string(),
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let html_tmp = stage(&paths.html, html.as_bytes()).map_err(|e| sink_err(&paths.html, e))?;
    let json_tmp = stage(&paths.json, json.as_bytes()).map_err(|e| sink_err(&paths.json, e))?;

    json_tmp
        .persist(&paths.json)
        .map_err(|e| sink_err(&paths.json, e.error))?;
    if let Err(e) = html_tmp.persist(&paths.html) {
        warn!(
            "{} was replaced but {} was not",
            paths.json.display(),
            paths.html.display()
        );
        return Err(sink_err(&paths.html, e.error));
    }

    debug!(
        "Wrote {} and {}",
        paths.html.display(),
        paths.json.display()
    );
    Ok(paths)
}

/// Write `contents` to a synced temp file next to `path`, ready to persist.
fn stage(path: &Path, contents: &[u8]) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), "101", "<html/>", "{}").unwrap();

        assert_eq!(paths.html, dir.path().join("101.html"));
        assert_eq!(paths.json, dir.path().join("101.ann.json"));
        assert_eq!(std::fs::read_to_string(&paths.html).unwrap(), "<html/>");
        assert_eq!(std::fs::read_to_string(&paths.json).unwrap(), "{}");
    }

    #[test]
    fn overwrites_existing_artifacts() {
        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), "1", "old", "old").unwrap();
        let paths = write_artifacts(dir.path(), "1", "new", "new").unwrap();
        assert_eq!(std::fs::read_to_string(paths.json).unwrap(), "new");
    }

    #[test]
    fn missing_directory_is_sink_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = write_artifacts(&missing, "1", "h", "j").unwrap_err();
        assert!(matches!(err, RecordError::SinkIo { ref id, .. } if id == "1"));
    }

    #[test]
    fn failed_json_write_keeps_earlier_html() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1.html"), "old").unwrap();
        // A non-empty directory where the JSON goes makes the rename fail.
        let blocker = dir.path().join("1.ann.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("x"), "").unwrap();

        let err = write_artifacts(dir.path(), "1", "new", "new").unwrap_err();

        assert!(matches!(err, RecordError::SinkIo { ref path, .. } if path == &blocker));
        assert_eq!(std::fs::read_to_string(dir.path().join("1.html")).unwrap(), "old");
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2, "temp files left behind: {names:?}");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), "7", "h", "j").unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2, "got: {names:?}");
    }
}
