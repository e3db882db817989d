use crate::catalog::{self, DatasetDef};
use crate::error::{Result, SweepError};
use retri_pipeline::EvaluateOverride;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Marker substring selecting the dataset-family-specific evaluation profile
const OXFORD_MARKER: &str = "oxford";

/// Identifier of the evaluation profile every catalog must supply
pub const DEFAULT_EVALUATE: &str = "overall";

/// Identifier of the Oxford-family evaluation profile
pub const OXFORD_EVALUATE: &str = "oxford_overall";

/// First dataset whose identifier is contained in the directory name.
/// `None` means the directory is not part of the search space.
pub fn select_dataset<'a>(
    dir_name: &str,
    datasets: &'a BTreeMap<String, DatasetDef>,
) -> Option<(&'a str, &'a DatasetDef)> {
    datasets
        .iter()
        .find(|(data_name, _)| dir_name.contains(data_name.as_str()))
        .map(|(data_name, def)| (data_name.as_str(), def))
}

/// Evaluation profile for a directory: the Oxford profile when the marker is
/// present, the default otherwise. A catalog without the selected profile is
/// a configuration error.
pub fn select_evaluate<'a>(
    dir_name: &str,
    evaluates: &'a BTreeMap<String, EvaluateOverride>,
) -> Result<(&'a str, &'a EvaluateOverride)> {
    let name = if dir_name.contains(OXFORD_MARKER) {
        OXFORD_EVALUATE
    } else {
        DEFAULT_EVALUATE
    };
    evaluates
        .get_key_value(name)
        .map(|(name, profile)| (name.as_str(), profile))
        .ok_or_else(|| {
            SweepError::Config(format!(
                "evaluation profile `{name}` missing from the search-modules catalog"
            ))
        })
}

/// Candidate feature names for a directory
pub fn select_feature_names(dir_name: &str) -> Vec<String> {
    catalog::feature_names_for(dir_name)
}

/// Gallery/query/train feature-directory paths for a discovered directory:
/// the gallery is the directory itself; the query and train paths substitute
/// the dataset identifier with the matching sub-collection template.
pub fn resolve_feature_dirs(
    root: &Path,
    dir_name: &str,
    data_name: &str,
    def: &DatasetDef,
) -> (PathBuf, PathBuf, PathBuf) {
    let gallery = root.join(dir_name);
    let query = root.join(dir_name.replace(data_name, &def.query));
    let train = root.join(dir_name.replace(data_name, &def.train));
    (gallery, query, train)
}
