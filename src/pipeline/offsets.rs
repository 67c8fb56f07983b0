//! Offset mapping: document offsets → (segment, local offset).
//!
//! PubTator measures offsets over `title + "\n" + abstract`. The rendered
//! document puts the title and the abstract in separate segments, so an
//! offset is re-anchored to whichever segment it starts in:
//!
//! ```text
//! title  = "Test Title"            (len 10)
//! offset:  0 ........ 9 | 10 | 11 ...
//!          s1h1 (0..9)    sep  s2p1 (0..)
//! ```
//!
//! An offset equal to the title length lands on the separator and maps to
//! local offset `-1` in the abstract; [`BoundaryPolicy`] decides what
//! happens to it.

use crate::config::BoundaryPolicy;
use crate::document::{Document, MappedEntity, RawEntity, Segment};
use crate::error::RecordError;
use tracing::{debug, warn};

/// Width of the separator between title and abstract in PubTator offsets.
pub const TITLE_SEPARATOR_LEN: usize = 1;

/// Map a document offset to its segment and segment-local offset.
///
/// Total over its inputs. The title test is strict `<` against `title_len`,
/// so `start == title_len` yields `(AbstractBody, -1)`.
pub fn map_offset(start: usize, title_len: usize) -> (Segment, i64) {
    if start < title_len {
        (Segment::TitleHeading, start as i64)
    } else {
        (
            Segment::AbstractBody,
            start as i64 - (title_len + TITLE_SEPARATOR_LEN) as i64,
        )
    }
}

/// Map every entity of `doc`, in source order.
pub fn map_entities(
    doc: &Document,
    policy: BoundaryPolicy,
) -> Result<Vec<MappedEntity>, RecordError> {
    let title_len = doc.title_len();
    doc.entities
        .iter()
        .map(|raw| map_entity(doc, raw, title_len, policy))
        .collect()
}

fn map_entity(
    doc: &Document,
    raw: &RawEntity,
    title_len: usize,
    policy: BoundaryPolicy,
) -> Result<MappedEntity, RecordError> {
    let (segment, mut local_offset) = map_offset(raw.start, title_len);

    // Mismatched entities are emitted without a position.
    let id_matches = raw.document_id == doc.id;
    if !id_matches {
        warn!(
            id = %doc.id,
            entity_id = %raw.document_id,
            line = raw.line,
            "entity id does not match record id; emitting without position"
        );
    } else if local_offset < 0 {
        match policy {
            BoundaryPolicy::Reject => {
                return Err(RecordError::OffsetOnSeparator {
                    id: doc.id.clone(),
                    offset: raw.start,
                });
            }
            BoundaryPolicy::Clamp => {
                debug!(id = %doc.id, line = raw.line, "clamping separator offset to 0");
                local_offset = 0;
            }
            BoundaryPolicy::Verbatim => {}
        }
    }

    Ok(MappedEntity {
        segment,
        local_offset,
        text: raw.text.clone(),
        source_class: raw.source_class.clone(),
        normalization: raw.normalization.clone(),
        id_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse_record;

    #[test]
    fn offsets_inside_title_are_unchanged() {
        for t in 1..20 {
            for o in 0..t {
                assert_eq!(map_offset(o, t), (Segment::TitleHeading, o as i64));
            }
        }
    }

    #[test]
    fn offsets_past_separator_shift_into_abstract() {
        for t in 0..20usize {
            for o in (t + 1)..(t + 30) {
                assert_eq!(
                    map_offset(o, t),
                    (Segment::AbstractBody, (o - t - 1) as i64)
                );
            }
        }
    }

    #[test]
    fn separator_offset_maps_to_minus_one() {
        assert_eq!(map_offset(10, 10), (Segment::AbstractBody, -1));
    }

    fn boundary_doc() -> Document {
        // "Test Title" has length 10: offset 10 is the separator.
        parse_record(
            "101|t|Test Title\n101|a|This is an abstract.\n101\t10\t14\tThis\tGene\t1",
            1,
        )
        .unwrap()
    }

    #[test]
    fn reject_policy_fails_on_separator() {
        let err = map_entities(&boundary_doc(), BoundaryPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            RecordError::OffsetOnSeparator {
                id: "101".into(),
                offset: 10
            }
        );
    }

    #[test]
    fn clamp_policy_moves_to_abstract_start() {
        let mapped = map_entities(&boundary_doc(), BoundaryPolicy::Clamp).unwrap();
        assert_eq!(mapped[0].segment, Segment::AbstractBody);
        assert_eq!(mapped[0].local_offset, 0);
    }

    #[test]
    fn verbatim_policy_keeps_minus_one() {
        let mapped = map_entities(&boundary_doc(), BoundaryPolicy::Verbatim).unwrap();
        assert_eq!(mapped[0].local_offset, -1);
    }

    #[test]
    fn mismatched_ids_are_flagged() {
        let doc = parse_record("1|t|Title\n1|a|Abs\n1\t0\t1\tT\tGene\t\n2\t6\t9\tAbs\tGene\t", 1)
            .unwrap();
        let mapped = map_entities(&doc, BoundaryPolicy::Reject).unwrap();
        assert!(mapped[0].id_matches);
        assert!(!mapped[1].id_matches);
        assert_eq!(mapped[1].local_offset, 0);
    }

    #[test]
    fn mismatched_id_on_separator_is_not_rejected() {
        let doc = parse_record(
            "101|t|Test Title\n101|a|This is an abstract.\n999\t10\t14\tThis\tGene\t1",
            1,
        )
        .unwrap();
        let mapped = map_entities(&doc, BoundaryPolicy::Reject).unwrap();
        assert_eq!(mapped.len(), 1);
        assert!(!mapped[0].id_matches);
    }

    #[test]
    fn multibyte_title_uses_char_offsets() {
        // "β-cat" is 5 chars but 6 bytes.
        let doc = parse_record("1|t|β-cat\n1|a|Wnt signalling\n1\t6\t9\tWnt\tGene\t1", 1).unwrap();
        let mapped = map_entities(&doc, BoundaryPolicy::Reject).unwrap();
        assert_eq!(mapped[0].segment, Segment::AbstractBody);
        assert_eq!(mapped[0].local_offset, 0);
    }
}
