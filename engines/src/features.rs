use retri_pipeline::{FeatureLoader, FeatureSet, ItemInfo, PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One stored feature document: `<fea_dir>/<fea_name>.json`
#[derive(Debug, Deserialize)]
struct FeatureFile {
    fea: Vec<Vec<f32>>,
    info: Vec<ItemInfo>,

    #[serde(default)]
    aux: serde_json::Value,
}

/// Loads features from per-run directories holding one JSON document per
/// feature name. Requesting several names concatenates their rows per item.
#[derive(Debug, Clone, Default)]
pub struct DirFeatureLoader;

impl DirFeatureLoader {
    fn read_file(path: &Path) -> Result<FeatureFile> {
        let content = fs::read_to_string(path).map_err(|err| {
            PipelineError::Feature(format!("cannot read feature file {}: {err}", path.display()))
        })?;
        let file: FeatureFile = serde_json::from_str(&content).map_err(|err| {
            PipelineError::Feature(format!("malformed feature file {}: {err}", path.display()))
        })?;
        if file.fea.len() != file.info.len() {
            return Err(PipelineError::Feature(format!(
                "feature file {} has {} rows but {} info entries",
                path.display(),
                file.fea.len(),
                file.info.len()
            )));
        }
        Ok(file)
    }
}

impl FeatureLoader for DirFeatureLoader {
    fn load(&self, dir: &Path, fea_names: &[String]) -> Result<FeatureSet> {
        if fea_names.is_empty() {
            return Err(PipelineError::Feature(
                "no feature names requested".to_string(),
            ));
        }

        let mut merged: Option<FeatureSet> = None;
        for name in fea_names {
            let path = dir.join(format!("{name}.json"));
            let file = Self::read_file(&path)?;
            debug!(
                "loaded {} rows of `{}` from {}",
                file.fea.len(),
                name,
                dir.display()
            );

            match merged.as_mut() {
                None => {
                    merged = Some(FeatureSet {
                        fea: file.fea,
                        info: file.info,
                        aux: file.aux,
                    });
                }
                Some(set) => {
                    if set.info != file.info {
                        return Err(PipelineError::Feature(format!(
                            "feature `{name}` in {} does not align with previously loaded names",
                            dir.display()
                        )));
                    }
                    for (row, extra) in set.fea.iter_mut().zip(file.fea) {
                        row.extend(extra);
                    }
                }
            }
        }

        // fea_names is non-empty, so merged is always populated here
        merged.ok_or_else(|| PipelineError::Feature("empty feature set".to_string()))
    }
}
