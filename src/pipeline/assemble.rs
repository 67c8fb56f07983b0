//! Annotation assembly: [`Document`] + mapped entities → anndoc `.ann.json`.
//!
//! The schema follows tagtog's `ann.json`:
//!
//! ```json
//! {
//!   "anncomplete": false,
//!   "annotatable": { "parts": ["s1h1", "s2h1", "s2p1"] },
//!   "entities": [ ... ],
//!   "metas": {},
//!   "relations": [],
//!   "sources": [ { "id": "101", "name": "MEDLINE", "url": "..." } ]
//! }
//! ```
//!
//! Serialisation goes through [`serde_json::Value`], whose object map is a
//! `BTreeMap`, so keys come out sorted at every level and output for the
//! same input is byte-identical across runs.

use crate::config::{ConversionConfig, EntityClassMap};
use crate::document::{Document, MappedEntity, Segment};
use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level anndoc annotation object for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnDocument {
    pub annotatable: Annotatable,
    pub anncomplete: bool,
    pub sources: Vec<SourceRef>,
    pub relations: Vec<serde_json::Value>,
    pub metas: BTreeMap<String, serde_json::Value>,
    pub entities: Vec<EntityAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotatable {
    pub parts: Vec<Segment>,
}

/// External registry entry for the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub id: String,
    pub url: String,
}

/// One entity annotation.
///
/// `part` and `offsets` are absent for entities whose line id did not match
/// the record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub part: Option<Segment>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub offsets: Option<Vec<Offset>>,
    pub confidence: Confidence,
    #[serde(rename = "classId")]
    pub class_id: String,
    /// Normalisation codes are not resolved; always an empty object.
    pub normalizations: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub start: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub prob: f64,
    pub state: String,
    pub who: Vec<String>,
}

impl AnnDocument {
    /// Pretty JSON, two-space indent, keys sorted.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        serde_json::to_string_pretty(&value)
    }
}

/// Builds [`AnnDocument`]s from the constants in a [`ConversionConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    classes: &'a EntityClassMap,
    confidence: f64,
    tagger: &'a str,
    source_name: &'a str,
    source_url_prefix: &'a str,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a ConversionConfig) -> Self {
        Self {
            classes: &config.entity_classes,
            confidence: config.confidence,
            tagger: &config.tagger,
            source_name: &config.source_name,
            source_url_prefix: &config.source_url_prefix,
        }
    }

    /// Assemble the annotation object. Fails on the first entity whose class
    /// is missing from the class map; nothing partial is returned.
    pub fn assemble(
        &self,
        doc: &Document,
        mapped: &[MappedEntity],
    ) -> Result<AnnDocument, RecordError> {
        let entities = mapped
            .iter()
            .map(|m| self.entity(doc, m))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AnnDocument {
            annotatable: Annotatable {
                parts: Segment::ALL.to_vec(),
            },
            anncomplete: false,
            sources: vec![SourceRef {
                name: self.source_name.to_string(),
                id: doc.id.clone(),
                url: format!("{}{}", self.source_url_prefix, doc.id),
            }],
            relations: Vec::new(),
            metas: BTreeMap::new(),
            entities,
        })
    }

    fn entity(&self, doc: &Document, m: &MappedEntity) -> Result<EntityAnnotation, RecordError> {
        let class_id = self
            .classes
            .get(&m.source_class)
            .ok_or_else(|| RecordError::UnknownEntityClass {
                id: doc.id.clone(),
                class: m.source_class.clone(),
            })?;

        let (part, offsets) = if m.id_matches {
            (
                Some(m.segment),
                Some(vec![Offset {
                    start: m.local_offset,
                    text: m.text.clone(),
                }]),
            )
        } else {
            (None, None)
        };

        Ok(EntityAnnotation {
            part,
            offsets,
            confidence: Confidence {
                prob: self.confidence,
                state: String::new(),
                who: vec![self.tagger.to_string()],
            },
            class_id: class_id.to_string(),
            normalizations: BTreeMap::new(),
        })
    }
}
