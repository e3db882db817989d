//! Reference implementations of the retrieval-pipeline collaborators.
//!
//! These back the shipped sweep binary: a JSON feature loader, a brute-force
//! similarity ranking engine, and a label-match evaluator. The sweep core
//! only ever sees them through the `retri-pipeline` traits.

mod evaluate;
mod features;
mod query;

pub use evaluate::StandardEvaluateEngine;
pub use features::DirFeatureLoader;
pub use query::StandardQueryEngine;

use retri_pipeline::{
    EvaluateConfig, EvaluateEngine, FeatureLoader, Pipeline, QueryConfig, QueryEngine, Result,
};

/// The collaborator bundle wired into the sweep binary
#[derive(Debug, Clone, Default)]
pub struct StandardPipeline {
    loader: DirFeatureLoader,
}

impl StandardPipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pipeline for StandardPipeline {
    fn loader(&self) -> &dyn FeatureLoader {
        &self.loader
    }

    fn build_query(&self, cfg: &QueryConfig) -> Result<Box<dyn QueryEngine>> {
        Ok(Box::new(StandardQueryEngine::new(cfg)?))
    }

    fn build_evaluate(&self, cfg: &EvaluateConfig) -> Result<Box<dyn EvaluateEngine>> {
        Ok(Box::new(StandardEvaluateEngine::new(cfg)))
    }
}
