//! Configuration types for PubTator-to-anndoc conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The tagger label, confidence value and
//! entity class table live here and are handed to the pipeline explicitly;
//! nothing in the pipeline reads process-wide state.

use crate::error::AnndocError;
use crate::hash_id::{HashIdGenerator, RandomHashIds};
use crate::progress::ProgressCallback;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Tagger label GNormPlus output is attributed to.
pub const DEFAULT_TAGGER: &str = "ml:GNormPlus";

/// Confidence assigned to every imported entity.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Registry named in the `sources` entry of each `.ann.json`.
pub const DEFAULT_SOURCE_NAME: &str = "MEDLINE";

/// Lookup URL prefix; the document id is appended.
pub const DEFAULT_SOURCE_URL_PREFIX: &str = "http://www.ncbi.nlm.nih.gov/pubmed/";

static GNORMPLUS_CLASSES: Lazy<EntityClassMap> = Lazy::new(|| {
    [
        ("Gene", "e_1"),
        ("FamilyName", "e_2"),
        ("DomainMotif", "e_3"),
        ("Species", "e_4"),
    ]
    .into_iter()
    .collect()
});

/// Mapping from PubTator entity class labels to anndoc `classId`s.
///
/// Serialises as a flat JSON object, e.g. `{"Gene": "e_1"}`, which is also
/// the format accepted by the CLI's `--classes` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityClassMap(BTreeMap<String, String>);

impl EntityClassMap {
    /// Empty map; every entity class is unknown until inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// The classes emitted by GNormPlus: Gene, FamilyName, DomainMotif and
    /// Species mapped to `e_1`..`e_4`.
    pub fn gnormplus() -> Self {
        GNORMPLUS_CLASSES.clone()
    }

    pub fn insert(&mut self, source_class: impl Into<String>, class_id: impl Into<String>) {
        self.0.insert(source_class.into(), class_id.into());
    }

    /// Resolve a PubTator class to its anndoc `classId`.
    pub fn get(&self, source_class: &str) -> Option<&str> {
        self.0.get(source_class).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a class map from a JSON object file.
    pub fn from_json_file(path: &Path) -> Result<Self, AnndocError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnndocError::InvalidConfig(format!(
                "cannot read class map '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            AnndocError::InvalidConfig(format!(
                "class map '{}' is not a JSON object of strings: {}",
                path.display(),
                e
            ))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityClassMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// What to do with an entity whose start offset is exactly the title length,
/// i.e. the separator character between title and abstract.
///
/// Such an offset maps into the abstract at local offset `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Fail the record with [`crate::error::RecordError::OffsetOnSeparator`]. (default)
    #[default]
    Reject,
    /// Move the entity to the first character of the abstract (offset 0).
    Clamp,
    /// Emit offset `-1` unchanged.
    Verbatim,
}

impl FromStr for BoundaryPolicy {
    type Err = AnndocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(BoundaryPolicy::Reject),
            "clamp" => Ok(BoundaryPolicy::Clamp),
            "verbatim" => Ok(BoundaryPolicy::Verbatim),
            other => Err(AnndocError::InvalidConfig(format!(
                "unknown boundary policy '{other}' (expected reject, clamp or verbatim)"
            ))),
        }
    }
}

/// Configuration for a PubTator-to-anndoc conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`] (GNormPlus class table).
///
/// # Example
/// ```rust
/// use pubtator2anndoc::{ConversionConfig, EntityClassMap};
///
/// let config = ConversionConfig::builder()
///     .entity_classes([("Disease", "e_5")].into_iter().collect::<EntityClassMap>())
///     .tagger("ml:TaggerOne")
///     .confidence(0.9)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// PubTator class → anndoc classId. Default: GNormPlus table.
    pub entity_classes: EntityClassMap,

    /// `confidence.prob` of every entity. Range: 0.0–1.0. Default: 1.0.
    pub confidence: f64,

    /// `confidence.who` of every entity. Default: `ml:GNormPlus`.
    pub tagger: String,

    /// Registry name written to `sources[0].name`. Default: `MEDLINE`.
    pub source_name: String,

    /// Prefix of `sources[0].url`; the document id is appended.
    pub source_url_prefix: String,

    /// Where artifacts are written. `None` means the input's directory.
    pub output_dir: Option<PathBuf>,

    /// Handling of entities starting on the title/abstract separator.
    pub boundary_policy: BoundaryPolicy,

    /// hashId source for the HTML artifact. Default: [`RandomHashIds`].
    pub hash_ids: Arc<dyn HashIdGenerator>,

    /// Optional per-record progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            entity_classes: EntityClassMap::gnormplus(),
            confidence: DEFAULT_CONFIDENCE,
            tagger: DEFAULT_TAGGER.to_string(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            source_url_prefix: DEFAULT_SOURCE_URL_PREFIX.to_string(),
            output_dir: None,
            boundary_policy: BoundaryPolicy::default(),
            hash_ids: Arc::new(RandomHashIds),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("entity_classes", &self.entity_classes)
            .field("confidence", &self.confidence)
            .field("tagger", &self.tagger)
            .field("source_name", &self.source_name)
            .field("source_url_prefix", &self.source_url_prefix)
            .field("output_dir", &self.output_dir)
            .field("boundary_policy", &self.boundary_policy)
            .field("hash_ids", &"<dyn HashIdGenerator>")
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn entity_classes(mut self, classes: EntityClassMap) -> Self {
        self.config.entity_classes = classes;
        self
    }

    /// Add or override a single class mapping.
    pub fn entity_class(mut self, source_class: impl Into<String>, class_id: impl Into<String>) -> Self {
        self.config.entity_classes.insert(source_class, class_id);
        self
    }

    pub fn confidence(mut self, prob: f64) -> Self {
        self.config.confidence = prob;
        self
    }

    pub fn tagger(mut self, tagger: impl Into<String>) -> Self {
        self.config.tagger = tagger.into();
        self
    }

    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.config.source_name = name.into();
        self
    }

    pub fn source_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.source_url_prefix = prefix.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.config.boundary_policy = policy;
        self
    }

    pub fn hash_ids(mut self, generator: Arc<dyn HashIdGenerator>) -> Self {
        self.config.hash_ids = generator;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, AnndocError> {
        let c = &self.config;
        if c.entity_classes.is_empty() {
            return Err(AnndocError::InvalidConfig(
                "entity class map must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&c.confidence) {
            return Err(AnndocError::InvalidConfig(format!(
                "confidence must be 0.0–1.0, got {}",
                c.confidence
            )));
        }
        if c.tagger.trim().is_empty() {
            return Err(AnndocError::InvalidConfig("tagger label must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_gnormplus() {
        let c = ConversionConfig::default();
        assert_eq!(c.entity_classes.get("Gene"), Some("e_1"));
        assert_eq!(c.entity_classes.get("Species"), Some("e_4"));
        assert_eq!(c.entity_classes.get("Disease"), None);
        assert_eq!(c.tagger, "ml:GNormPlus");
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.boundary_policy, BoundaryPolicy::Reject);
    }

    #[test]
    fn builder_rejects_out_of_range_confidence() {
        let err = ConversionConfig::builder().confidence(1.5).build().unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn builder_rejects_empty_class_map() {
        let err = ConversionConfig::builder()
            .entity_classes(EntityClassMap::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, AnndocError::InvalidConfig(_)));
    }

    #[test]
    fn builder_adds_single_class() {
        let c = ConversionConfig::builder()
            .entity_class("Disease", "e_5")
            .build()
            .unwrap();
        assert_eq!(c.entity_classes.get("Disease"), Some("e_5"));
        assert_eq!(c.entity_classes.len(), 5);
    }

    #[test]
    fn boundary_policy_from_str() {
        assert_eq!("Clamp".parse::<BoundaryPolicy>().unwrap(), BoundaryPolicy::Clamp);
        assert_eq!(" verbatim ".parse::<BoundaryPolicy>().unwrap(), BoundaryPolicy::Verbatim);
        assert!("skip".parse::<BoundaryPolicy>().is_err());
    }

    #[test]
    fn class_map_roundtrips_as_flat_object() {
        let map: EntityClassMap = serde_json::from_str(r#"{"Gene": "g", "Chemical": "c"}"#).unwrap();
        assert_eq!(map.get("Chemical"), Some("c"));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"Chemical":"c","Gene":"g"}"#);
    }
}
