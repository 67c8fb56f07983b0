//! Pipeline stages for PubTator-to-anndoc conversion.
//!
//! Each submodule implements exactly one transformation step and is tested
//! on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ split ──▶ parse ──▶ offsets ──▶ assemble ──▶ sink
//!                        └───────────────▶ render ───────┘
//! ```
//!
//! 1. [`input`]    — classify the path (file or directory) and decode text
//! 2. [`split`]    — cut the blob into records on blank lines
//! 3. [`parse`]    — title, abstract and entity lines → `Document`
//! 4. [`offsets`]  — re-anchor entity offsets to rendered segments
//! 5. [`assemble`] — build the `.ann.json` object
//! 6. [`render`]   — build the HTML with the matching segment ids
//! 7. [`sink`]     — atomically write both artifacts

pub mod assemble;
pub mod input;
pub mod offsets;
pub mod parse;
pub mod render;
pub mod sink;
pub mod split;
