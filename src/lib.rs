//! # pubtator2anndoc
//!
//! Convert biomedical literature annotated in the PubTator format into the
//! anndoc document pair used by the tagtog annotation tool: an HTML
//! rendering of each document plus an `.ann.json` describing its entity
//! annotations, anchored to character offsets within that rendering.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PubTator file / directory
//!  │
//!  ├─ 1. Input     resolve file vs directory, decode UTF-8
//!  ├─ 2. Split     one record per blank-line separated block
//!  ├─ 3. Parse     title, abstract, tab-separated entity lines
//!  ├─ 4. Offsets   title+"\n"+abstract offsets → (segment, local offset)
//!  ├─ 5. Assemble  ann.json with classId, confidence, tagger, sources
//!  ├─ 6. Render    HTML with segments s1h1 / s2h1 / s2p1
//!  └─ 7. Sink      <id>.html + <id>.ann.json, written atomically
//! ```
//!
//! A malformed record is reported and skipped; the rest of the batch still
//! converts.
//!
//! ## Quick Start
//!
//! ```rust
//! use pubtator2anndoc::{convert_str, ConversionConfig};
//!
//! let blob = "101|t|Test Title\n101|a|This is an abstract.\n101\t5\t9\tTitl\tGene\t1234\n";
//! let output = convert_str(blob, &ConversionConfig::default()).unwrap();
//!
//! let record = &output.records[0];
//! assert_eq!(record.annotations.entities[0].class_id, "e_1");
//! assert!(record.html.contains(r#"<h2 id="s1h1">Test Title</h2>"#));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pubtator2anndoc` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod hash_id;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BoundaryPolicy, ConversionConfig, ConversionConfigBuilder, EntityClassMap};
pub use convert::{convert_path, convert_record, convert_str};
pub use document::{Document, MappedEntity, RawEntity, Segment};
pub use error::{AnndocError, RecordError};
pub use hash_id::{DeterministicHashIds, HashIdGenerator, RandomHashIds};
pub use output::{BatchReport, BatchStats, ConversionOutput, ConvertedRecord, RecordResult};
pub use pipeline::assemble::AnnDocument;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
