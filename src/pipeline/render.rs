//! HTML rendering: [`Document`] → anndoc 2.0 HTML.
//!
//! The rendered document has exactly three identified regions, whose ids are
//! the [`Segment`] strings the `.ann.json` refers to:
//!
//! ```text
//! article
//!  ├─ section[data-type=title]     h2#s1h1      title
//!  └─ section[data-type=abstract]  h3#s2h1      "Abstract"
//!                                  div.content > p#s2p1   abstract
//! ```
//!
//! Text is entity-escaped. Escaping changes the byte length of the markup but
//! not the decoded text content of a region, and annotation offsets are
//! measured over decoded text, so offsets computed on the raw title and
//! abstract stay valid.

use crate::document::{Document, Segment};
use std::fmt::Write;

/// Heading text of the abstract section.
pub const ABSTRACT_HEADING: &str = "Abstract";

const ANNDOC_VERSION: &str = "2.0";
const GENERATOR: &str = "org.rostlab.relna";
const INDENT: &str = "  ";

/// Render the anndoc HTML for `doc`, identified by `hash_id`.
pub fn render_html(doc: &Document, hash_id: &str) -> String {
    let mut out = String::with_capacity(1024 + doc.title.len() + doc.abstract_text.len());
    let mut w = Writer { out: &mut out };

    w.raw(0, "<!DOCTYPE html>");
    w.raw(
        0,
        &format!(
            r#"<html data-origid="{}" data-anndoc-version="{}" lang="" xml:lang="" xmlns="http://www.w3.org/1999/xhtml" class="anndoc" id="{}">"#,
            escape_attr(&doc.id),
            ANNDOC_VERSION,
            escape_attr(hash_id)
        ),
    );
    w.raw(1, "<head>");
    w.raw(2, r#"<meta charset="UTF-8" />"#);
    w.raw(
        2,
        &format!(r#"<meta name="generator" content="{GENERATOR}" />"#),
    );
    w.raw(2, &format!("<title>{}</title>", escape_text(hash_id)));
    w.raw(1, "</head>");
    w.raw(1, "<body>");
    w.raw(2, "<article>");
    w.raw(3, r#"<section data-type="title">"#);
    w.region(4, "h2", Segment::TitleHeading, &doc.title);
    w.raw(3, "</section>");
    w.raw(3, r#"<section data-type="abstract">"#);
    w.region(4, "h3", Segment::AbstractHeading, ABSTRACT_HEADING);
    w.raw(4, r#"<div class="content">"#);
    w.region(5, "p", Segment::AbstractBody, &doc.abstract_text);
    w.raw(4, "</div>");
    w.raw(3, "</section>");
    w.raw(2, "</article>");
    w.raw(1, "</body>");
    w.raw(0, "</html>");

    out
}

struct Writer<'a> {
    out: &'a mut String,
}

impl Writer<'_> {
    fn raw(&mut self, depth: usize, line: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn region(&mut self, depth: usize, tag: &str, segment: Segment, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        // Writing to a String cannot fail.
        let _ = writeln!(
            self.out,
            r#"<{tag} id="{}">{}</{tag}>"#,
            segment.as_str(),
            escape_text(text)
        );
    }
}

/// Escape text content. Only `&`, `<` and `>` need escaping there.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value (text escapes plus quotes).
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
