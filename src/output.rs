//! Conversion results: per-record outcomes and batch statistics.

use crate::error::RecordError;
use crate::pipeline::assemble::AnnDocument;
use crate::pipeline::sink::ArtifactPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Both artifacts of one successfully converted record, in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRecord {
    pub document_id: String,
    /// The hashId embedded in `html`.
    pub hash_id: String,
    pub html: String,
    pub annotations: AnnDocument,
    /// `annotations` serialised with sorted keys.
    pub json: String,
}

impl ConvertedRecord {
    pub fn entity_count(&self) -> usize {
        self.annotations.entities.len()
    }
}

/// Outcome of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    /// 1-indexed position within the batch.
    pub position: usize,
    /// Input file the record came from, when converting from disk.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub input: Option<PathBuf>,
    pub document_id: Option<String>,
    pub entity_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub artifacts: Option<ArtifactPaths>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<RecordError>,
}

impl RecordResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_records: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_entities: usize,
    pub duration_ms: u64,
}

impl BatchStats {
    pub(crate) fn from_results(results: &[RecordResult], duration_ms: u64) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total_records: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            total_entities: results
                .iter()
                .filter(|r| r.is_success())
                .map(|r| r.entity_count)
                .sum(),
            duration_ms,
        }
    }
}

/// Result of an in-memory conversion ([`crate::convert::convert_str`]).
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Successful records, in input order.
    pub records: Vec<ConvertedRecord>,
    /// One entry per record, successful or not, in input order.
    pub results: Vec<RecordResult>,
    pub stats: BatchStats,
}

/// Result of an on-disk conversion ([`crate::convert::convert_path`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub results: Vec<RecordResult>,
    /// Directory entries that could not be read or decoded.
    pub skipped_inputs: Vec<SkippedInput>,
    pub stats: BatchStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInput {
    pub path: PathBuf,
    pub reason: String,
}
