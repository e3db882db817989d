use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sub-collection name templates for one dataset. The catalog key (the
/// dataset identifier) doubles as the gallery template in the reference
/// deployment, but nothing relies on that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetDef {
    pub gallery: String,
    pub query: String,
    pub train: String,
}

impl DatasetDef {
    fn new(gallery: &str, query: &str, train: &str) -> Self {
        Self {
            gallery: gallery.to_string(),
            query: query.to_string(),
            train: train.to_string(),
        }
    }
}

/// Architecture marker selecting the VGG feature-name candidates
const VGG_MARKER: &str = "vgg";

const VGG_FEATURES: [&str; 1] = ["pool5_PWA"];
const RES_FEATURES: [&str; 1] = ["pool5_PWA"];

/// The fixed dataset catalog: identifier → sub-collection templates
pub fn datasets() -> BTreeMap<String, DatasetDef> {
    BTreeMap::from([
        (
            "oxford_gallery".to_string(),
            DatasetDef::new("oxford_gallery", "oxford_query", "paris_all"),
        ),
        (
            "cub_gallery".to_string(),
            DatasetDef::new("cub_gallery", "cub_query", "cub_gallery"),
        ),
        (
            "indoor_gallery".to_string(),
            DatasetDef::new("indoor_gallery", "indoor_query", "indoor_gallery"),
        ),
        (
            "caltech_gallery".to_string(),
            DatasetDef::new("caltech_gallery", "caltech_query", "caltech_gallery"),
        ),
    ])
}

/// Candidate feature names for a feature directory, selected by the
/// architecture marker in its name. Falls through to the ResNet list.
pub fn feature_names_for(dir_name: &str) -> Vec<String> {
    let names: &[&str] = if dir_name.contains(VGG_MARKER) {
        &VGG_FEATURES
    } else {
        &RES_FEATURES
    };
    names.iter().map(|name| name.to_string()).collect()
}
