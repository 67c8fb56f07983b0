//! hashId generation for the HTML artifact.
//!
//! anndoc identifies each rendered document by a `hashId` of the form
//! `<32 hex chars>:<document id>`. The value appears in the HTML only (the
//! `<html id>` attribute and `<title>`), never in the `.ann.json` artifact,
//! so JSON output stays byte-identical across runs regardless of generator.

use uuid::Uuid;

/// Source of hashIds for rendered documents.
///
/// Implementations must be `Send + Sync` so a single generator can be
/// shared through [`crate::config::ConversionConfig`].
pub trait HashIdGenerator: Send + Sync {
    /// Produce the hashId for the document with the given id.
    fn hash_id(&self, document_id: &str) -> String;
}

/// Random hashIds (UUID v4). The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomHashIds;

impl HashIdGenerator for RandomHashIds {
    fn hash_id(&self, document_id: &str) -> String {
        format!("{}:{}", Uuid::new_v4().simple(), document_id)
    }
}

/// Reproducible hashIds: a UUID v5 derived from the document id.
///
/// Re-running a conversion with this generator yields byte-identical HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicHashIds;

impl HashIdGenerator for DeterministicHashIds {
    fn hash_id(&self, document_id: &str) -> String {
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, document_id.as_bytes());
        format!("{}:{}", uuid.simple(), document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_shape(hash: &str, id: &str) {
        let (hex, suffix) = hash.split_once(':').expect("colon separator");
        assert_eq!(hex.len(), 32, "got: {hash}");
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(suffix, id);
    }

    #[test]
    fn random_ids_have_expected_shape() {
        assert_shape(&RandomHashIds.hash_id("12345"), "12345");
    }

    #[test]
    fn random_ids_differ_between_calls() {
        assert_ne!(RandomHashIds.hash_id("1"), RandomHashIds.hash_id("1"));
    }

    #[test]
    fn deterministic_ids_are_stable() {
        let a = DeterministicHashIds.hash_id("101");
        assert_shape(&a, "101");
        assert_eq!(a, DeterministicHashIds.hash_id("101"));
        assert_ne!(a, DeterministicHashIds.hash_id("102"));
    }
}
