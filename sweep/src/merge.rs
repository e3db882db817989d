use retri_pipeline::{
    EvaluateOverride, PipelineConfig, QueryOverride, TRAINED_POST_PROCESSORS,
};
use std::path::Path;

/// Per-experiment query override: a fresh copy of the query definition with
/// the active feature list narrowed to `fea_name` and the train-split
/// directory injected into every decomposition step the definition names.
/// The definition itself is never mutated, so reuse across directories and
/// feature names cannot leak state.
pub fn merge_query_override(
    query_def: &QueryOverride,
    fea_name: &str,
    train_fea_dir: &Path,
) -> QueryOverride {
    let mut merged = query_def.clone();
    merged.feature_names = Some(vec![fea_name.to_string()]);

    if let Some(post) = merged.post_processors.as_mut() {
        let trained: Vec<String> = post
            .names
            .iter()
            .filter(|name| TRAINED_POST_PROCESSORS.contains(&name.as_str()))
            .cloned()
            .collect();
        for name in trained {
            post.params.entry(name).or_default().train_fea_dir =
                Some(train_fea_dir.to_path_buf());
        }
    }

    merged
}

/// Effective pipeline configuration: the baseline with its query section
/// overwritten field-by-field by `query` and its evaluation section by
/// `evaluate`. Fields absent from an override keep their baseline defaults;
/// the baseline is left untouched for the next experiment.
pub fn merge_into_baseline(
    baseline: &PipelineConfig,
    query: &QueryOverride,
    evaluate: &EvaluateOverride,
) -> PipelineConfig {
    let mut cfg = baseline.clone();
    query.apply_to(&mut cfg.query);
    evaluate.apply_to(&mut cfg.evaluate);
    cfg
}
