use pretty_assertions::assert_eq;
use retri_pipeline::{
    EvaluateConfig, EvaluateEngine, EvaluateOverride, FeatureLoader, FeatureSet, ItemInfo,
    Pipeline, PipelineConfig, PostProcessorsConfig, QueryConfig, QueryEngine, QueryOverride,
    QueryResults, RankedList, RecallAtK, Result as PipelineResult, PipelineError,
};
use retri_sweep::{ResultRecord, ResultStore, SearchModules, Sweeper};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Deterministic stand-in for the external pipeline: two gallery items, one
/// query item, identity ranking, fixed metrics. Records every load and every
/// query config it is built from.
#[derive(Default)]
struct MockState {
    loaded_dirs: RefCell<Vec<PathBuf>>,
    query_cfgs: RefCell<Vec<QueryConfig>>,
    fail_dirs_containing: Option<String>,
}

struct MockPipeline {
    state: Rc<MockState>,
}

impl MockPipeline {
    fn new() -> Self {
        Self {
            state: Rc::new(MockState::default()),
        }
    }

    fn failing_on(marker: &str) -> Self {
        Self {
            state: Rc::new(MockState {
                fail_dirs_containing: Some(marker.to_string()),
                ..Default::default()
            }),
        }
    }
}

impl FeatureLoader for MockPipeline {
    fn load(&self, dir: &Path, _fea_names: &[String]) -> PipelineResult<FeatureSet> {
        if let Some(marker) = &self.state.fail_dirs_containing
            && dir.to_string_lossy().contains(marker.as_str())
        {
            return Err(PipelineError::Feature(format!(
                "injected failure for {}",
                dir.display()
            )));
        }
        self.state.loaded_dirs.borrow_mut().push(dir.to_path_buf());
        Ok(FeatureSet {
            fea: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            info: vec![
                ItemInfo {
                    label: "cat".to_string(),
                    path: "g0.jpg".to_string(),
                },
                ItemInfo {
                    label: "dog".to_string(),
                    path: "g1.jpg".to_string(),
                },
            ],
            aux: serde_json::Value::Null,
        })
    }
}

struct MockQueryEngine;

impl QueryEngine for MockQueryEngine {
    fn do_query(
        &self,
        _query_fea: &[Vec<f32>],
        query_info: &[ItemInfo],
        gallery_fea: &[Vec<f32>],
    ) -> PipelineResult<QueryResults> {
        let ranked = query_info
            .iter()
            .map(|info| RankedList {
                query: info.clone(),
                indices: (0..gallery_fea.len()).collect(),
                scores: vec![1.0; gallery_fea.len()],
            })
            .collect();
        Ok(QueryResults { ranked })
    }
}

struct MockEvaluateEngine {
    cfg: EvaluateConfig,
}

impl EvaluateEngine for MockEvaluateEngine {
    fn do_eval(
        &self,
        _results: &QueryResults,
        _gallery_info: &[ItemInfo],
    ) -> PipelineResult<(f64, RecallAtK)> {
        let recall = self.cfg.recall_k.iter().map(|k| (*k, 0.75)).collect();
        Ok((0.5, recall))
    }
}

impl Pipeline for MockPipeline {
    fn loader(&self) -> &dyn FeatureLoader {
        self
    }

    fn build_query(&self, cfg: &QueryConfig) -> PipelineResult<Box<dyn QueryEngine>> {
        self.state.query_cfgs.borrow_mut().push(cfg.clone());
        Ok(Box::new(MockQueryEngine))
    }

    fn build_evaluate(&self, cfg: &EvaluateConfig) -> PipelineResult<Box<dyn EvaluateEngine>> {
        Ok(Box::new(MockEvaluateEngine { cfg: cfg.clone() }))
    }
}

fn search_modules(query_names: &[&str]) -> SearchModules {
    let queries = query_names
        .iter()
        .map(|name| (name.to_string(), QueryOverride::default()))
        .collect();
    let evaluates = BTreeMap::from([
        ("overall".to_string(), EvaluateOverride::default()),
        (
            "oxford_overall".to_string(),
            EvaluateOverride {
                recall_k: Some(vec![1, 10]),
                ignore_self: None,
            },
        ),
    ]);
    SearchModules { queries, evaluates }
}

fn feature_root(dir_names: &[&str]) -> TempDir {
    let root = TempDir::new().expect("temp dir");
    for name in dir_names {
        fs::create_dir(root.path().join(name)).expect("create feature dir");
    }
    root
}

fn identities(store: &ResultStore) -> Vec<(String, String, String, String)> {
    let mut out: Vec<_> = store
        .records()
        .iter()
        .map(|record| {
            (
                record.dir.clone(),
                record.data_name.clone(),
                record.query_name.clone(),
                record.fea_name.clone(),
            )
        })
        .collect();
    out.sort();
    out
}

#[test]
fn sweep_is_idempotent_across_runs() {
    let root = feature_root(&["res_cub_gallery_001", "vgg_oxford_gallery", "res_imagenet"]);
    let save_dir = TempDir::new().expect("temp dir");
    let save_path = save_dir.path().join("results.json");

    let pipeline = MockPipeline::new();
    let store = ResultStore::load(&save_path).expect("load");
    let mut sweeper = Sweeper::new(
        search_modules(&["q1", "q2"]),
        PipelineConfig::default(),
        store,
        &pipeline,
    )
    .expect("sweeper");
    let first = sweeper.run(root.path()).expect("first run");
    // 2 matching dirs x 2 queries x 1 feature name; res_imagenet matches nothing.
    assert_eq!(first.executed, 4);
    assert_eq!(first.skipped, 0);
    let after_first = identities(sweeper.store());

    let pipeline = MockPipeline::new();
    let store = ResultStore::load(&save_path).expect("reload");
    let mut sweeper = Sweeper::new(
        search_modules(&["q1", "q2"]),
        PipelineConfig::default(),
        store,
        &pipeline,
    )
    .expect("sweeper");
    let second = sweeper.run(root.path()).expect("second run");
    assert_eq!(second.executed, 0);
    assert_eq!(second.skipped, 4);
    assert_eq!(identities(sweeper.store()), after_first);
    // The second run never touched the pipeline.
    assert!(pipeline.state.loaded_dirs.borrow().is_empty());
}

#[test]
fn sweep_resumes_from_a_partial_store() {
    let root = feature_root(&["res_cub_gallery_001", "vgg_oxford_gallery"]);
    let save_dir = TempDir::new().expect("temp dir");
    let save_path = save_dir.path().join("results.json");

    // Seed one of the four expected identities.
    let mut seed = ResultStore::load(&save_path).expect("load");
    seed.append_and_persist(ResultRecord {
        dir: "res_cub_gallery_001".to_string(),
        data_name: "cub_gallery".to_string(),
        query_name: "q1".to_string(),
        fea_name: "pool5_PWA".to_string(),
        map: 0.1,
        recall_at_k: BTreeMap::new(),
    })
    .expect("seed");

    let pipeline = MockPipeline::new();
    let store = ResultStore::load(&save_path).expect("reload");
    let mut sweeper = Sweeper::new(
        search_modules(&["q1", "q2"]),
        PipelineConfig::default(),
        store,
        &pipeline,
    )
    .expect("sweeper");
    let stats = sweeper.run(root.path()).expect("run");

    assert_eq!(stats.executed, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(sweeper.store().len(), 4);
    let ids = identities(sweeper.store());
    let unique: std::collections::BTreeSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate identity recorded");
    // The seeded record kept the metrics it was stored with.
    let seeded = sweeper
        .store()
        .records()
        .iter()
        .find(|record| record.query_name == "q1" && record.dir == "res_cub_gallery_001")
        .expect("seeded record");
    assert_eq!(seeded.map, 0.1);
}

#[test]
fn effective_configs_carry_feature_name_and_train_dir() {
    let root = feature_root(&["vgg_oxford_gallery"]);
    let save_dir = TempDir::new().expect("temp dir");
    let save_path = save_dir.path().join("results.json");

    let mut modules = search_modules(&[]);
    modules.queries.insert(
        "q_pca".to_string(),
        QueryOverride {
            post_processors: Some(PostProcessorsConfig {
                names: vec!["L2Normalize".to_string(), "PCA".to_string()],
                params: BTreeMap::new(),
            }),
            ..Default::default()
        },
    );

    let pipeline = MockPipeline::new();
    let store = ResultStore::load(&save_path).expect("load");
    let mut sweeper =
        Sweeper::new(modules, PipelineConfig::default(), store, &pipeline).expect("sweeper");
    sweeper.run(root.path()).expect("run");

    let cfgs = pipeline.state.query_cfgs.borrow();
    assert_eq!(cfgs.len(), 1);
    assert_eq!(cfgs[0].feature_names, vec!["pool5_PWA".to_string()]);
    let pca = cfgs[0]
        .post_processors
        .params
        .get("PCA")
        .expect("PCA params");
    // Oxford trains on the Paris split.
    assert_eq!(
        pca.train_fea_dir,
        Some(root.path().join("vgg_paris_all"))
    );
    assert!(
        !cfgs[0]
            .post_processors
            .params
            .contains_key("L2Normalize")
    );
}

#[test]
fn pipeline_failure_halts_sweep_and_keeps_persisted_prefix() {
    // Sorted scan order: res_cub_gallery_001 runs first, vgg_oxford_gallery fails.
    let root = feature_root(&["res_cub_gallery_001", "vgg_oxford_gallery"]);
    let save_dir = TempDir::new().expect("temp dir");
    let save_path = save_dir.path().join("results.json");

    let pipeline = MockPipeline::failing_on("oxford");
    let store = ResultStore::load(&save_path).expect("load");
    let mut sweeper = Sweeper::new(
        search_modules(&["q1"]),
        PipelineConfig::default(),
        store,
        &pipeline,
    )
    .expect("sweeper");

    assert!(sweeper.run(root.path()).is_err());

    let on_disk = ResultStore::load(&save_path).expect("reload");
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk.records()[0].dir, "res_cub_gallery_001");
}

#[test]
fn missing_default_profile_is_rejected_before_any_work() {
    let mut modules = search_modules(&["q1"]);
    modules.evaluates.remove("overall");

    let pipeline = MockPipeline::new();
    let save_dir = TempDir::new().expect("temp dir");
    let store = ResultStore::load(&save_dir.path().join("results.json")).expect("load");
    assert!(Sweeper::new(modules, PipelineConfig::default(), store, &pipeline).is_err());
}

#[test]
fn end_to_end_single_directory_scenario() {
    let root = feature_root(&["res_cub_gallery_001"]);
    let save_dir = TempDir::new().expect("temp dir");
    let save_path = save_dir.path().join("results.json");

    let pipeline = MockPipeline::new();
    let store = ResultStore::load(&save_path).expect("load");
    let mut sweeper = Sweeper::new(
        search_modules(&["q1"]),
        PipelineConfig::default(),
        store,
        &pipeline,
    )
    .expect("sweeper");
    let stats = sweeper.run(root.path()).expect("run");
    assert_eq!(stats.executed, 1);

    let records = sweeper.store().records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.dir, "res_cub_gallery_001");
    assert_eq!(record.data_name, "cub_gallery");
    assert_eq!(record.query_name, "q1");
    assert_eq!(record.fea_name, "pool5_PWA");
    assert!(record.map.is_finite());
    // Baseline recall cutoffs, persisted under string keys.
    let keys: Vec<&str> = record.recall_at_k.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1", "2", "4", "8"]);

    // Gallery is the directory itself, query comes from the substituted split.
    let loaded = pipeline.state.loaded_dirs.borrow();
    assert!(loaded.contains(&root.path().join("res_cub_gallery_001")));
    assert!(loaded.contains(&root.path().join("res_cub_query_001")));

    // Running again adds nothing and executes nothing.
    let pipeline = MockPipeline::new();
    let store = ResultStore::load(&save_path).expect("reload");
    let mut sweeper = Sweeper::new(
        search_modules(&["q1"]),
        PipelineConfig::default(),
        store,
        &pipeline,
    )
    .expect("sweeper");
    let stats = sweeper.run(root.path()).expect("second run");
    assert_eq!(stats.executed, 0);
    assert_eq!(stats.skipped, 1);
    assert_eq!(sweeper.store().len(), 1);
}
