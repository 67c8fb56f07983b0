//! Batch conversion entry points.
//!
//! Every record runs the same pipeline, independently of its siblings:
//!
//! ```text
//! parse ──▶ map offsets ──▶ assemble JSON ──▶ render HTML ──▶ (write)
//! ```
//!
//! A record that fails at any stage is reported in its [`RecordResult`] and
//! the batch moves on. Both artifacts are fully built before anything is
//! written, so a failing record never leaves a partial artifact.

use crate::config::ConversionConfig;
use crate::error::{AnndocError, RecordError};
use crate::output::{
    BatchReport, BatchStats, ConversionOutput, ConvertedRecord, RecordResult, SkippedInput,
};
use crate::pipeline::assemble::Assembler;
use crate::pipeline::input::{self, InputSource};
use crate::pipeline::sink::{self, ArtifactPaths};
use crate::pipeline::{offsets, parse, render, split};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a single PubTator record to its HTML and annotation artifacts.
///
/// `position` is the record's 1-indexed place in its batch, used only to
/// attribute errors when the document id cannot be read.
pub fn convert_record(
    record: &str,
    position: usize,
    config: &ConversionConfig,
) -> Result<ConvertedRecord, RecordError> {
    let doc = parse::parse_record(record, position)?;
    let mapped = offsets::map_entities(&doc, config.boundary_policy)?;
    let annotations = Assembler::new(config).assemble(&doc, &mapped)?;
    let json = annotations
        .to_json_pretty()
        .map_err(|e| RecordError::MalformedRecord {
            position,
            id: Some(doc.id.clone()),
            detail: format!("cannot serialise annotations: {e}"),
        })?;

    let hash_id = config.hash_ids.hash_id(&doc.id);
    let html = render::render_html(&doc, &hash_id);
    debug!(id = %doc.id, entities = annotations.entities.len(), "converted record");

    Ok(ConvertedRecord {
        document_id: doc.id,
        hash_id,
        html,
        annotations,
        json,
    })
}

/// Convert a PubTator blob in memory. A leading BOM and CRLF line endings
/// are accepted, as for files.
///
/// # Errors
/// Returns `Err` only when every record of a non-empty blob failed.
/// Otherwise per-record failures are in `output.results`.
pub fn convert_str(blob: &str, config: &ConversionConfig) -> Result<ConversionOutput, AnndocError> {
    let start = Instant::now();
    let blob = input::normalise_text(blob);
    let pending: Vec<PendingRecord<'_>> = split::split_records(&blob)
        .map(|text| PendingRecord { input: None, text })
        .collect();

    let mut records = Vec::new();
    let results = run_batch(&pending, config, |converted| {
        records.push(converted);
        Ok(None)
    });

    let stats = BatchStats::from_results(&results, start.elapsed().as_millis() as u64);
    ensure_any_success(&results, &stats)?;
    Ok(ConversionOutput {
        records,
        results,
        stats,
    })
}

/// Convert a PubTator file, or every PubTator file in a directory, writing
/// `<id>.html` and `<id>.ann.json` per record.
///
/// Artifacts go to `config.output_dir`, or the input's directory if unset.
/// In directory mode an unreadable file is skipped and listed in
/// `report.skipped_inputs`; for a single file it is fatal.
pub fn convert_path(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchReport, AnndocError> {
    let start = Instant::now();
    let source = InputSource::resolve(input_path.as_ref())?;
    info!("Starting conversion: {}", input_path.as_ref().display());

    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| source.default_output_dir());
    std::fs::create_dir_all(&output_dir).map_err(|e| AnndocError::OutputDirFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    let mut blobs: Vec<(PathBuf, String)> = Vec::new();
    let mut skipped_inputs = Vec::new();
    for file in source.files()? {
        match input::read_blob(&file) {
            Ok(blob) => blobs.push((file, blob)),
            Err(e) if matches!(source, InputSource::Directory(_)) => {
                warn!("Skipping {}: {}", file.display(), e);
                skipped_inputs.push(SkippedInput {
                    path: file,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    let pending: Vec<PendingRecord<'_>> = blobs
        .iter()
        .flat_map(|(path, blob)| {
            split::split_records(blob).map(move |text| PendingRecord {
                input: Some(path.as_path()),
                text,
            })
        })
        .collect();

    let results = run_batch(&pending, config, |converted| {
        sink::write_artifacts(
            &output_dir,
            &converted.document_id,
            &converted.html,
            &converted.json,
        )
        .map(Some)
    });

    let stats = BatchStats::from_results(&results, start.elapsed().as_millis() as u64);
    ensure_any_success(&results, &stats)?;
    info!(
        "Conversion complete: {}/{} records, {} entities, {}ms → {}",
        stats.succeeded,
        stats.total_records,
        stats.total_entities,
        stats.duration_ms,
        output_dir.display()
    );

    Ok(BatchReport {
        output_dir,
        results,
        skipped_inputs,
        stats,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

struct PendingRecord<'a> {
    input: Option<&'a Path>,
    text: &'a str,
}

/// Run every record through [`convert_record`], handing successes to
/// `deliver`. Failures never stop the loop.
fn run_batch<F>(
    pending: &[PendingRecord<'_>],
    config: &ConversionConfig,
    mut deliver: F,
) -> Vec<RecordResult>
where
    F: FnMut(ConvertedRecord) -> Result<Option<ArtifactPaths>, RecordError>,
{
    let total = pending.len();
    let progress = config.progress_callback.as_ref();
    if total == 0 {
        warn!("Input contains no PubTator records");
    } else {
        info!("Converting {} records", total);
    }
    if let Some(cb) = progress {
        cb.on_batch_start(total);
    }

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut results = Vec::with_capacity(total);

    for (idx, record) in pending.iter().enumerate() {
        let position = idx + 1;
        if let Some(cb) = progress {
            cb.on_record_start(position, total);
        }

        let outcome = convert_record(record.text, position, config).and_then(|converted| {
            if seen_ids.contains(&converted.document_id) {
                return Err(RecordError::DuplicateId {
                    id: converted.document_id,
                });
            }
            let id = converted.document_id.clone();
            let entity_count = converted.entity_count();
            let artifacts = deliver(converted)?;
            seen_ids.insert(id.clone());
            Ok((id, entity_count, artifacts))
        });

        let result = match outcome {
            Ok((id, entity_count, artifacts)) => {
                if let Some(cb) = progress {
                    cb.on_record_complete(position, total, &id, entity_count);
                }
                RecordResult {
                    position,
                    input: record.input.map(Path::to_path_buf),
                    document_id: Some(id),
                    entity_count,
                    artifacts,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    "Record {} ({}) failed: {}",
                    position,
                    e.document_id().unwrap_or("unknown id"),
                    e
                );
                if let Some(cb) = progress {
                    cb.on_record_error(position, total, &e.to_string());
                }
                RecordResult {
                    position,
                    input: record.input.map(Path::to_path_buf),
                    document_id: e.document_id().map(str::to_string),
                    entity_count: 0,
                    artifacts: None,
                    error: Some(e),
                }
            }
        };
        results.push(result);
    }

    if let Some(cb) = progress {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        cb.on_batch_complete(total, succeeded);
    }
    results
}

fn ensure_any_success(results: &[RecordResult], stats: &BatchStats) -> Result<(), AnndocError> {
    if stats.total_records > 0 && stats.succeeded == 0 {
        let first_error = results
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(AnndocError::AllRecordsFailed {
            total: stats.total_records,
            first_error,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryPolicy;
    use crate::document::Segment;
    use crate::hash_id::DeterministicHashIds;
    use std::sync::Arc;

    const SAMPLE: &str = "101|t|Test Title\n101|a|This is an abstract.\n101\t5\t9\tTitl\tGENE\t1234\n";

    fn config() -> ConversionConfig {
        ConversionConfig::builder()
            .entity_class("GENE", "e_1")
            .hash_ids(Arc::new(DeterministicHashIds))
            .build()
            .unwrap()
    }

    #[test]
    fn converts_sample_record() {
        let rec = convert_record(SAMPLE, 1, &config()).unwrap();
        assert_eq!(rec.document_id, "101");
        assert!(rec.hash_id.ends_with(":101"));
        assert!(rec.html.contains(&rec.hash_id));
        assert!(!rec.json.contains(&rec.hash_id));

        let e = &rec.annotations.entities[0];
        assert_eq!(e.part, Some(Segment::TitleHeading));
        assert_eq!(e.offsets.as_ref().unwrap()[0].start, 5);
        assert_eq!(e.class_id, "e_1");
    }

    #[test]
    fn batch_continues_after_bad_record() {
        let blob = format!("broken record\n\n{SAMPLE}\n202|t|Other\n202|a|Body\n");
        let out = convert_str(&blob, &config()).unwrap();

        assert_eq!(out.stats.total_records, 3);
        assert_eq!(out.stats.succeeded, 2);
        assert_eq!(out.stats.failed, 1);
        assert_eq!(out.results[0].position, 1);
        assert!(matches!(
            out.results[0].error,
            Some(RecordError::MalformedRecord { position: 1, .. })
        ));
        let ids: Vec<&str> = out.records.iter().map(|r| r.document_id.as_str()).collect();
        assert_eq!(ids, vec!["101", "202"]);
    }

    #[test]
    fn duplicate_ids_fail_the_later_record() {
        let blob = format!("{SAMPLE}\n{SAMPLE}");
        let out = convert_str(&blob, &config()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(
            out.results[1].error,
            Some(RecordError::DuplicateId { id: "101".into() })
        );
    }

    #[test]
    fn crlf_blob_splits_into_records() {
        let blob = "\u{FEFF}101|t|Test Title\r\n101|a|This is an abstract.\r\n\
                    101\t5\t9\tTitl\tGENE\t1234\r\n\r\n202|t|Other\r\n202|a|Body\r\n";
        let out = convert_str(blob, &config()).unwrap();

        assert_eq!(out.stats.total_records, 2);
        assert_eq!(out.stats.failed, 0);
        assert_eq!(out.records[0].document_id, "101");
        assert_eq!(out.records[0].annotations.entities[0].offsets.as_ref().unwrap()[0].text, "Titl");
        assert!(!out.records[1].html.contains('\r'));
    }

    #[test]
    fn all_failed_is_fatal() {
        let err = convert_str("5|t|T\n5|a|A\n5\t0\t1\tT\tDisease\t1", &config()).unwrap_err();
        assert!(matches!(err, AnndocError::AllRecordsFailed { total: 1, .. }));
    }

    #[test]
    fn empty_input_is_empty_batch() {
        let out = convert_str("\n\n", &config()).unwrap();
        assert_eq!(out.stats.total_records, 0);
        assert!(out.records.is_empty());
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let a = convert_str(SAMPLE, &config()).unwrap();
        let b = convert_str(SAMPLE, &config()).unwrap();
        assert_eq!(a.records[0].json, b.records[0].json);
        assert_eq!(a.records[0].html, b.records[0].html);
    }

    #[test]
    fn boundary_policy_is_applied() {
        let record = "101|t|Test Title\n101|a|This is an abstract.\n101\t10\t14\tThis\tGENE\t1";
        let err = convert_record(record, 1, &config()).unwrap_err();
        assert!(matches!(err, RecordError::OffsetOnSeparator { offset: 10, .. }));

        let clamp = ConversionConfig {
            boundary_policy: BoundaryPolicy::Clamp,
            ..config()
        };
        let rec = convert_record(record, 1, &clamp).unwrap();
        let e = &rec.annotations.entities[0];
        assert_eq!(e.part, Some(Segment::AbstractBody));
        assert_eq!(e.offsets.as_ref().unwrap()[0].start, 0);
    }
}
