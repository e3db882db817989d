use crate::error::{Result, SweepError};
use crate::select::DEFAULT_EVALUATE;
use retri_pipeline::{EvaluateOverride, QueryOverride};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Catalog file a search-modules directory must contain
pub const QUERY_DICT_FILE: &str = "query_dict.toml";

/// The pluggable search space: query definitions and evaluation profiles
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchModules {
    #[serde(default)]
    pub queries: BTreeMap<String, QueryOverride>,

    #[serde(default)]
    pub evaluates: BTreeMap<String, EvaluateOverride>,
}

impl SearchModules {
    /// A catalog without the default evaluation profile cannot drive any
    /// sweep; reported before work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.evaluates.contains_key(DEFAULT_EVALUATE) {
            return Err(SweepError::Config(format!(
                "search modules must define the `{DEFAULT_EVALUATE}` evaluation profile"
            )));
        }
        Ok(())
    }
}

/// Capability interface for loading the query/evaluate catalogs from a
/// locator. Any registry (file-based, compiled-in, remote) may implement it.
pub trait QueryCatalogProvider {
    fn load(&self, locator: &Path) -> Result<SearchModules>;
}

/// File-based registry: reads `query_dict.toml` from the locator directory
#[derive(Debug, Clone, Default)]
pub struct FileCatalogProvider;

impl QueryCatalogProvider for FileCatalogProvider {
    fn load(&self, locator: &Path) -> Result<SearchModules> {
        let path = locator.join(QUERY_DICT_FILE);
        let content = fs::read_to_string(&path).map_err(|err| {
            SweepError::Modules(format!(
                "cannot read search modules from {}: {err}",
                path.display()
            ))
        })?;
        toml::from_str(&content).map_err(|err| {
            SweepError::Modules(format!(
                "malformed search modules in {}: {err}",
                path.display()
            ))
        })
    }
}
