//! Record splitting: one PubTator blob → one `&str` per record.
//!
//! Records are separated by a blank line. Whitespace-only blocks (for
//! example the trailing newline at end of file) are dropped. Splitting never
//! fails; structural validation is left to [`crate::pipeline::parse`].

/// Boundary between two PubTator records.
pub const RECORD_SEPARATOR: &str = "\n\n";

/// Split a normalised (LF-only) blob into records, in file order.
///
/// Extra blank lines between records are tolerated: leading newlines are
/// stripped from each record.
pub fn split_records(blob: &str) -> impl Iterator<Item = &str> {
    blob.split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_line_in_order() {
        let blob = "1|t|A\n1|a|B\n\n2|t|C\n2|a|D\n";
        let records: Vec<&str> = split_records(blob).collect();
        assert_eq!(records, vec!["1|t|A\n1|a|B", "2|t|C\n2|a|D\n"]);
    }

    #[test]
    fn drops_trailing_blank_blocks() {
        let blob = "1|t|A\n1|a|B\n\n\n\n  \n\n";
        let records: Vec<&str> = split_records(blob).collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn tolerates_extra_blank_lines_between_records() {
        let blob = "1|t|A\n1|a|B\n\n\n2|t|C\n2|a|D";
        let records: Vec<&str> = split_records(blob).collect();
        assert_eq!(records, vec!["1|t|A\n1|a|B", "2|t|C\n2|a|D"]);
    }

    #[test]
    fn empty_blob_has_no_records() {
        assert_eq!(split_records("").count(), 0);
        assert_eq!(split_records("\n\n\n").count(), 0);
    }
}
