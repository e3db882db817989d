//! Narrow interfaces between the sweep driver and the retrieval pipeline.
//!
//! The sweep core consumes three collaborators: a [`FeatureLoader`] for
//! stored features, a [`QueryEngine`] for ranking, and an [`EvaluateEngine`]
//! for metrics. This crate defines those traits plus the configuration types
//! the collaborators are built from; implementations live elsewhere
//! (`retri-engines` ships the reference ones).

mod config;
mod error;
mod evaluate;
mod features;
mod query;

pub use config::{
    EvaluateConfig, EvaluateOverride, PipelineConfig, PostProcessorParams, PostProcessorsConfig,
    QueryConfig, QueryOverride, TRAINED_POST_PROCESSORS,
};
pub use error::{PipelineError, Result};
pub use evaluate::{EvaluateEngine, RecallAtK};
pub use features::{FeatureLoader, FeatureSet, ItemInfo};
pub use query::{QueryEngine, QueryResults, RankedList};

/// A bundle of pipeline collaborators: the loader plus the stage factories
/// the driver calls per experiment.
pub trait Pipeline {
    fn loader(&self) -> &dyn FeatureLoader;

    /// Build the query stage from an effective query configuration
    fn build_query(&self, cfg: &QueryConfig) -> Result<Box<dyn QueryEngine>>;

    /// Build the evaluation stage from an effective evaluation configuration
    fn build_evaluate(&self, cfg: &EvaluateConfig) -> Result<Box<dyn EvaluateEngine>>;
}
