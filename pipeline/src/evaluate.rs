use crate::error::Result;
use crate::features::ItemInfo;
use crate::query::QueryResults;
use std::collections::BTreeMap;

/// Recall per integer cutoff k
pub type RecallAtK = BTreeMap<u32, f64>;

/// The evaluation stage, constructed from an effective evaluation config.
/// Returns the mean average precision and recall at each configured cutoff.
pub trait EvaluateEngine {
    fn do_eval(&self, results: &QueryResults, gallery_info: &[ItemInfo])
    -> Result<(f64, RecallAtK)>;
}
