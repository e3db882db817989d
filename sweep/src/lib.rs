//! Sweep orchestrator for retrieval experiments over stored features.
//!
//! A sweep scans a root of per-run feature directories, enumerates the
//! directory × dataset × query × feature-name search space, skips every
//! combination already present in the persisted result store, and runs the
//! rest through the pipeline collaborators (feature loading → ranking →
//! evaluation), checkpointing the store after each completed experiment.
//! Interrupting a sweep at any point loses at most the experiment in flight;
//! rerunning with the same save path resumes where it stopped.

pub mod catalog;
pub mod driver;
pub mod error;
pub mod merge;
pub mod modules;
pub mod select;
pub mod store;

pub use catalog::{DatasetDef, datasets, feature_names_for};
pub use driver::{SweepStats, Sweeper};
pub use error::{Result, SweepError};
pub use merge::{merge_into_baseline, merge_query_override};
pub use modules::{FileCatalogProvider, QueryCatalogProvider, SearchModules};
pub use select::{select_dataset, select_evaluate, select_feature_names};
pub use store::{ResultRecord, ResultStore};
