use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Post-processing steps whose parameters include a training-feature
/// directory. These are the decomposition steps fitted on the train split.
pub const TRAINED_POST_PROCESSORS: [&str; 4] = ["PartPCA", "PartSVD", "PCA", "SVD"];

/// Full pipeline configuration: the query stage and the evaluation stage.
///
/// `PipelineConfig::default()` is the shared baseline a sweep starts from;
/// per-experiment overrides are merged onto clones of it, never onto the
/// baseline itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub evaluate: EvaluateConfig,
}

/// Configuration for the query/ranking stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Names of the stored features to load and rank with
    #[serde(default)]
    pub feature_names: Vec<String>,

    /// Distance metric used for ranking
    #[serde(default = "default_distance")]
    pub distance: String,

    /// Number of gallery items to keep per query; 0 ranks the whole gallery
    #[serde(default)]
    pub top_k: usize,

    /// Feature post-processing applied before ranking
    #[serde(default)]
    pub post_processors: PostProcessorsConfig,
}

fn default_distance() -> String {
    "cosine".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            feature_names: Vec::new(),
            distance: default_distance(),
            top_k: 0,
            post_processors: PostProcessorsConfig::default(),
        }
    }
}

/// Ordered post-processing step names plus per-step parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostProcessorsConfig {
    #[serde(default)]
    pub names: Vec<String>,

    /// Parameters keyed by step name; steps without an entry use defaults
    #[serde(default)]
    pub params: BTreeMap<String, PostProcessorParams>,
}

/// Parameters for a single post-processing step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostProcessorParams {
    /// Directory of the train-split features the step is fitted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_fea_dir: Option<PathBuf>,

    /// Output dimensionality for decomposition steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj_dim: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whiten: Option<bool>,
}

/// Configuration for the evaluation stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluateConfig {
    /// Cutoffs for recall@k
    #[serde(default = "default_recall_k")]
    pub recall_k: Vec<u32>,

    /// Drop the rank-0 hit when gallery and query splits share items
    #[serde(default)]
    pub ignore_self: bool,
}

fn default_recall_k() -> Vec<u32> {
    vec![1, 2, 4, 8]
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            recall_k: default_recall_k(),
            ignore_self: false,
        }
    }
}

/// Partial query configuration: a query definition from the search-modules
/// catalog. Only the fields present override the baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processors: Option<PostProcessorsConfig>,
}

impl QueryOverride {
    /// Overwrite the fields of `cfg` that this override carries
    pub fn apply_to(&self, cfg: &mut QueryConfig) {
        if let Some(feature_names) = &self.feature_names {
            cfg.feature_names = feature_names.clone();
        }
        if let Some(distance) = &self.distance {
            cfg.distance = distance.clone();
        }
        if let Some(top_k) = self.top_k {
            cfg.top_k = top_k;
        }
        if let Some(post_processors) = &self.post_processors {
            cfg.post_processors = post_processors.clone();
        }
    }
}

/// Partial evaluation configuration: an evaluation profile from the
/// search-modules catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvaluateOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_k: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_self: Option<bool>,
}

impl EvaluateOverride {
    /// Overwrite the fields of `cfg` that this override carries
    pub fn apply_to(&self, cfg: &mut EvaluateConfig) {
        if let Some(recall_k) = &self.recall_k {
            cfg.recall_k = recall_k.clone();
        }
        if let Some(ignore_self) = self.ignore_self {
            cfg.ignore_self = ignore_self;
        }
    }
}
