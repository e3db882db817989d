use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One completed experiment. Identity is the (dir, data_name, query_name,
/// fea_name) 4-tuple; the metric fields are payload. Field names are part of
/// the persisted format and must stay stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub dir: String,
    pub data_name: String,
    pub query_name: String,
    pub fea_name: String,

    #[serde(rename = "mAP")]
    pub map: f64,

    /// Recall per string-encoded integer cutoff
    pub recall_at_k: BTreeMap<String, f64>,
}

impl ResultRecord {
    fn same_identity(&self, dir: &str, data_name: &str, query_name: &str, fea_name: &str) -> bool {
        self.dir == dir
            && self.data_name == data_name
            && self.query_name == query_name
            && self.fea_name == fea_name
    }
}

/// The authoritative record of completed experiments, persisted as a single
/// JSON array. Loaded once at sweep start, appended to and rewritten in full
/// after every completed experiment.
#[derive(Debug)]
pub struct ResultStore {
    path: PathBuf,
    records: Vec<ResultRecord>,
}

impl ResultStore {
    /// Load the store at `path`. A missing file is the normal fresh-sweep
    /// case; an unparseable file is fatal (prior results must not be
    /// silently discarded).
    pub fn load(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|err| {
                SweepError::Store(format!(
                    "cannot parse result store {}: {err}",
                    path.display()
                ))
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Membership by identity 4-tuple
    pub fn contains(&self, dir: &str, data_name: &str, query_name: &str, fea_name: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.same_identity(dir, data_name, query_name, fea_name))
    }

    /// Append `record` and rewrite the persisted document. The document is
    /// written to a temp file next to the target and renamed over it, so an
    /// interrupted sweep always leaves a complete, loadable snapshot.
    pub fn append_and_persist(&mut self, record: ResultRecord) -> Result<()> {
        self.records.push(record);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string(&self.records).map_err(|err| {
            SweepError::Store(format!("cannot serialize result store: {err}"))
        })?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
