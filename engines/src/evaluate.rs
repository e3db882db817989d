use retri_pipeline::{
    EvaluateConfig, EvaluateEngine, ItemInfo, QueryResults, RecallAtK, Result,
};

/// Label-match evaluator: mean average precision over all queries plus
/// recall@k (fraction of a query's relevant items retrieved within the top k,
/// averaged over queries) for the configured cutoffs.
#[derive(Debug, Clone)]
pub struct StandardEvaluateEngine {
    cfg: EvaluateConfig,
}

impl StandardEvaluateEngine {
    pub fn new(cfg: &EvaluateConfig) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl EvaluateEngine for StandardEvaluateEngine {
    fn do_eval(
        &self,
        results: &QueryResults,
        gallery_info: &[ItemInfo],
    ) -> Result<(f64, RecallAtK)> {
        let mut ap_sum = 0.0;
        let mut recall_sums: RecallAtK = self.cfg.recall_k.iter().map(|k| (*k, 0.0)).collect();
        let mut scored_queries = 0usize;

        for list in &results.ranked {
            let is_self = |idx: usize| {
                self.cfg.ignore_self
                    && !list.query.path.is_empty()
                    && gallery_info[idx].path == list.query.path
            };
            let relevant_total = gallery_info
                .iter()
                .enumerate()
                .filter(|(idx, item)| item.label == list.query.label && !is_self(*idx))
                .count();
            if relevant_total == 0 {
                continue;
            }
            scored_queries += 1;

            let mut hits = 0usize;
            let mut precision_sum = 0.0;
            let mut rank = 0usize;
            for &idx in &list.indices {
                if is_self(idx) {
                    continue;
                }
                rank += 1;
                if gallery_info[idx].label == list.query.label {
                    hits += 1;
                    precision_sum += hits as f64 / rank as f64;
                }
                for (k, sum) in recall_sums.iter_mut() {
                    if rank == *k as usize {
                        *sum += hits as f64 / relevant_total as f64;
                    }
                }
            }
            // Cutoffs beyond the ranked depth see the full retrieved count
            for (k, sum) in recall_sums.iter_mut() {
                if *k as usize > rank {
                    *sum += hits as f64 / relevant_total as f64;
                }
            }
            ap_sum += precision_sum / relevant_total as f64;
        }

        let map = if scored_queries == 0 {
            0.0
        } else {
            ap_sum / scored_queries as f64
        };
        let recall_at_k = recall_sums
            .into_iter()
            .map(|(k, sum)| {
                let recall = if scored_queries == 0 {
                    0.0
                } else {
                    sum / scored_queries as f64
                };
                (k, recall)
            })
            .collect();

        Ok((map, recall_at_k))
    }
}
