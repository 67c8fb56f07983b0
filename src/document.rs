//! Parsed PubTator documents and the segment ids shared with the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One PubTator record: title, abstract and entity lines in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub entities: Vec<RawEntity>,
}

impl Document {
    /// Title length in chars, the unit PubTator offsets are measured in.
    pub fn title_len(&self) -> usize {
        self.title.chars().count()
    }
}

/// One tab-separated entity line, offsets still in the coordinate space of
/// `title + "\n" + abstract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntity {
    pub document_id: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub source_class: String,
    pub normalization: String,
    /// 1-indexed line within the record, for error reporting.
    pub line: usize,
}

/// An identified region of the rendered document.
///
/// The string ids are the contract between the HTML renderer and the
/// `annotatable.parts` / `entities[].part` fields of the JSON artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "s1h1")]
    TitleHeading,
    #[serde(rename = "s2h1")]
    AbstractHeading,
    #[serde(rename = "s2p1")]
    AbstractBody,
}

impl Segment {
    /// Every segment, in document order.
    pub const ALL: [Segment; 3] = [
        Segment::TitleHeading,
        Segment::AbstractHeading,
        Segment::AbstractBody,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::TitleHeading => "s1h1",
            Segment::AbstractHeading => "s2h1",
            Segment::AbstractBody => "s2p1",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity re-anchored to a rendered segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedEntity {
    pub segment: Segment,
    /// Offset in chars from the start of `segment`'s text. Negative only
    /// under [`crate::config::BoundaryPolicy::Verbatim`].
    pub local_offset: i64,
    pub text: String,
    pub source_class: String,
    pub normalization: String,
    /// Whether the entity line's id equals the record id. Mismatched
    /// entities are kept but emitted without position fields.
    pub id_matches: bool,
}
