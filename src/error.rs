//! Error types for the pubtator2anndoc library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AnndocError`] — **Fatal**: the batch cannot proceed at all
//!   (input missing or undecodable, invalid configuration, output directory
//!   cannot be created). Returned as `Err(AnndocError)` from the top-level
//!   `convert*` functions.
//!
//! * [`RecordError`] — **Non-fatal**: a single PubTator record failed
//!   (malformed line, unknown entity class, write failure) but its siblings
//!   are fine. Stored inside [`crate::output::RecordResult`] so every failure
//!   stays attributable to one record while the rest of the batch completes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pubtator2anndoc library.
///
/// Record-level failures use [`RecordError`] and are stored in
/// [`crate::output::RecordResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum AnndocError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path was not found.
    #[error("PubTator input not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the input.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input could not be read or decoded as UTF-8 text.
    #[error("Malformed input '{path}': {detail}")]
    MalformedInput { path: PathBuf, detail: String },

    /// Every record of a non-empty batch failed; nothing was produced.
    #[error("All {total} records failed.\nFirst error: {first_error}")]
    AllRecordsFailed { total: usize, first_error: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single record.
///
/// `position` is the 1-indexed record number within its input, used when
/// the document id could not be recovered.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RecordError {
    /// Record is structurally invalid: missing title/abstract line, too few
    /// fields, non-integer offsets.
    #[error("Record {position}{}: {detail}", id_suffix(.id))]
    MalformedRecord {
        position: usize,
        id: Option<String>,
        detail: String,
    },

    /// An entity class is absent from the configured class map.
    #[error("Record '{id}': entity class '{class}' is not in the class map")]
    UnknownEntityClass { id: String, class: String },

    /// An entity starts on the title/abstract separator and the boundary
    /// policy rejects it.
    #[error("Record '{id}': entity offset {offset} falls on the title/abstract separator")]
    OffsetOnSeparator { id: String, offset: usize },

    /// Another record in the same batch already used this id.
    #[error("Record '{id}': duplicate document id in batch")]
    DuplicateId { id: String },

    /// Writing one of the record's artifacts failed.
    #[error("Record '{id}': failed to write '{path}': {detail}")]
    SinkIo {
        id: String,
        path: PathBuf,
        detail: String,
    },
}

impl RecordError {
    /// The document id this error is attributed to, when known.
    pub fn document_id(&self) -> Option<&str> {
        match self {
            RecordError::MalformedRecord { id, .. } => id.as_deref(),
            RecordError::UnknownEntityClass { id, .. }
            | RecordError::OffsetOnSeparator { id, .. }
            | RecordError::DuplicateId { id }
            | RecordError::SinkIo { id, .. } => Some(id),
        }
    }
}

fn id_suffix(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" ('{id}')"),
        None => String::new(),
    }
}
