use crate::catalog::{self, DatasetDef};
use crate::error::Result;
use crate::merge::{merge_into_baseline, merge_query_override};
use crate::modules::SearchModules;
use crate::select;
use crate::store::{ResultRecord, ResultStore};
use retri_pipeline::{Pipeline, PipelineConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Counts for one sweep pass. A resumed sweep over an unchanged search space
/// reports everything as skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub executed: usize,
    pub skipped: usize,
}

/// The sweep loop: directories × datasets × queries × feature names, gated
/// by dataset applicability and deduplicated against the result store.
pub struct Sweeper<'a> {
    datasets: BTreeMap<String, DatasetDef>,
    modules: SearchModules,
    baseline: PipelineConfig,
    store: ResultStore,
    pipeline: &'a dyn Pipeline,
}

impl<'a> Sweeper<'a> {
    pub fn new(
        modules: SearchModules,
        baseline: PipelineConfig,
        store: ResultStore,
        pipeline: &'a dyn Pipeline,
    ) -> Result<Self> {
        modules.validate()?;
        Ok(Self {
            datasets: catalog::datasets(),
            modules,
            baseline,
            store,
            pipeline,
        })
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Run one sweep over the feature directories under `fea_root`.
    ///
    /// Directories matching no dataset are skipped silently; identities
    /// already in the store are skipped and counted; collaborator failures
    /// propagate and halt the sweep with the store valid as of the last
    /// persisted experiment.
    pub fn run(&mut self, fea_root: &Path) -> Result<SweepStats> {
        let Self {
            datasets,
            modules,
            baseline,
            store,
            pipeline,
        } = self;

        let mut dir_names = Vec::new();
        for entry in fs::read_dir(fea_root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dir_names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        dir_names.sort();

        let mut stats = SweepStats::default();
        for dir_name in &dir_names {
            for (data_name, def) in datasets.iter() {
                if !dir_name.contains(data_name.as_str()) {
                    continue;
                }

                let (gallery_dir, query_dir, train_dir) =
                    select::resolve_feature_dirs(fea_root, dir_name, data_name, def);
                let (evaluate_name, evaluate) =
                    select::select_evaluate(dir_name, &modules.evaluates)?;
                let fea_names = select::select_feature_names(dir_name);
                if fea_names.is_empty() {
                    debug!("no candidate feature names for `{dir_name}`, skipping");
                    continue;
                }

                for (query_name, query_def) in &modules.queries {
                    for fea_name in &fea_names {
                        if store.contains(dir_name, data_name, query_name, fea_name) {
                            info!(
                                "config exists, skipping \
                                 {dir_name}/{data_name}/{query_name}/{fea_name}"
                            );
                            stats.skipped += 1;
                            continue;
                        }

                        let query_over = merge_query_override(query_def, fea_name, &train_dir);
                        let cfg = merge_into_baseline(baseline, &query_over, evaluate);

                        let query_set =
                            pipeline.loader().load(&query_dir, &cfg.query.feature_names)?;
                        let gallery_set =
                            pipeline.loader().load(&gallery_dir, &cfg.query.feature_names)?;

                        let query_engine = pipeline.build_query(&cfg.query)?;
                        let results = query_engine.do_query(
                            &query_set.fea,
                            &query_set.info,
                            &gallery_set.fea,
                        )?;

                        let evaluate_engine = pipeline.build_evaluate(&cfg.evaluate)?;
                        let (map, recall_at_k) =
                            evaluate_engine.do_eval(&results, &gallery_set.info)?;

                        store.append_and_persist(ResultRecord {
                            dir: dir_name.clone(),
                            data_name: data_name.clone(),
                            query_name: query_name.clone(),
                            fea_name: fea_name.clone(),
                            map,
                            recall_at_k: recall_at_k
                                .iter()
                                .map(|(k, recall)| (k.to_string(), *recall))
                                .collect(),
                        })?;
                        stats.executed += 1;
                        info!(
                            "{dir_name}/{data_name}/{query_name}/{fea_name}: \
                             mAP {map:.4} with evaluate `{evaluate_name}`"
                        );
                    }
                }
            }
        }

        Ok(stats)
    }
}
