use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata for a single gallery or query item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemInfo {
    /// Ground-truth label used for relevance judgments
    pub label: String,

    /// Source the item was extracted from
    #[serde(default)]
    pub path: String,
}

/// Features loaded from one feature directory for a set of feature names:
/// one row per item, aligned with `info`.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub fea: Vec<Vec<f32>>,
    pub info: Vec<ItemInfo>,
    pub aux: serde_json::Value,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.fea.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fea.is_empty()
    }

    /// Dimensionality of the feature rows; 0 for an empty set
    pub fn dim(&self) -> usize {
        self.fea.first().map(Vec::len).unwrap_or(0)
    }
}

/// Read-only access to stored features, keyed by directory and feature names
pub trait FeatureLoader {
    fn load(&self, dir: &Path, fea_names: &[String]) -> Result<FeatureSet>;
}
