//! Record parsing: one PubTator record → [`Document`].
//!
//! ```text
//! <id>|t|<title>
//! <id>|a|<abstract>
//! <id>\t<start>\t<end>\t<text>\t<class>\t<normalization>
//! ```
//!
//! The title is right-trimmed; the abstract is kept verbatim because entity
//! offsets past the title are measured against it. Entity lines whose id
//! differs from the record id are kept, not dropped.

use crate::document::{Document, RawEntity};
use crate::error::RecordError;
use tracing::{debug, warn};

/// Minimum number of tab-separated fields on an entity line.
pub const ENTITY_FIELDS: usize = 6;

/// Parse one record. `position` is its 1-indexed place in the batch and is
/// only used to attribute errors.
pub fn parse_record(record: &str, position: usize) -> Result<Document, RecordError> {
    let mut lines = record.split('\n');
    let malformed = |id: Option<&str>, detail: String| RecordError::MalformedRecord {
        position,
        id: id.map(str::to_string),
        detail,
    };

    let title_line = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| malformed(None, "missing title line".into()))?;
    let (id, tag, title) = split_text_line(title_line)
        .ok_or_else(|| malformed(None, format!("title line is not 'ID|t|title': {title_line:?}")))?;
    let id = id.trim_end();
    if id.is_empty() {
        return Err(malformed(None, "empty document id".into()));
    }
    check_id_is_file_safe(id).map_err(|detail| malformed(Some(id), detail))?;
    if tag != "t" {
        warn!(position, id, tag, "title line carries unexpected tag");
    }
    let title = title.trim_end();

    let abstract_line = lines
        .next()
        .ok_or_else(|| malformed(Some(id), "missing abstract line".into()))?;
    let (_, tag, abstract_text) = split_text_line(abstract_line).ok_or_else(|| {
        malformed(
            Some(id),
            format!("abstract line is not 'ID|a|abstract': {abstract_line:?}"),
        )
    })?;
    if tag != "a" {
        warn!(position, id, tag, "abstract line carries unexpected tag");
    }

    let mut entities = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 3;
        let entity = parse_entity_line(line, line_no).map_err(|detail| malformed(Some(id), detail))?;
        entities.push(entity);
    }

    debug!(position, id, entities = entities.len(), "parsed record");

    Ok(Document {
        id: id.to_string(),
        title: title.to_string(),
        abstract_text: abstract_text.to_string(),
        entities,
    })
}

/// Split `ID|TAG|content` into its three fields. Pipes inside `content`
/// are preserved.
fn split_text_line(line: &str) -> Option<(&str, &str, &str)> {
    let mut fields = line.splitn(3, '|');
    Some((fields.next()?, fields.next()?, fields.next()?))
}

fn parse_entity_line(line: &str, line_no: usize) -> Result<RawEntity, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < ENTITY_FIELDS {
        return Err(format!(
            "entity line {line_no} has {} tab-separated fields, expected {ENTITY_FIELDS}",
            fields.len()
        ));
    }

    let start = parse_offset(fields[1], "start", line_no)?;
    let end = parse_offset(fields[2], "end", line_no)?;
    if end < start {
        return Err(format!(
            "entity line {line_no}: end offset {end} precedes start offset {start}"
        ));
    }

    Ok(RawEntity {
        document_id: fields[0].trim_end().to_string(),
        start,
        end,
        text: fields[3].to_string(),
        source_class: fields[4].to_string(),
        normalization: fields[5].to_string(),
        line: line_no,
    })
}

fn parse_offset(field: &str, which: &str, line_no: usize) -> Result<usize, String> {
    field
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("entity line {line_no}: invalid {which} offset {field:?}: {e}"))
}

/// The id names the output files, so it must stay a single path component.
fn check_id_is_file_safe(id: &str) -> Result<(), String> {
    if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
        return Err(format!("document id {id:?} cannot be used as a file name"));
    }
    Ok(())
}
