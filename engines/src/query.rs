use retri_pipeline::{
    ItemInfo, PipelineError, QueryConfig, QueryEngine, QueryResults, RankedList, Result,
};
use tracing::debug;

/// Supported distance metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Distance {
    Cosine,
    Euclidean,
}

impl Distance {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            other => Err(PipelineError::Config(format!(
                "unknown distance metric `{other}`"
            ))),
        }
    }

    /// Higher is better for both metrics
    fn similarity(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Euclidean => {
                let dist: f32 = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum::<f32>()
                    .sqrt();
                -dist
            }
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

fn l2_normalize(rows: &mut [Vec<f32>]) {
    for row in rows {
        let mag: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        if mag > 0.0 {
            for x in row.iter_mut() {
                *x /= mag;
            }
        }
    }
}

/// Brute-force ranking engine: scores every gallery row against every query
/// row with the configured metric and sorts descending.
#[derive(Debug, Clone)]
pub struct StandardQueryEngine {
    cfg: QueryConfig,
    distance: Distance,
}

impl StandardQueryEngine {
    pub fn new(cfg: &QueryConfig) -> Result<Self> {
        let distance = Distance::parse(&cfg.distance)?;
        Ok(Self {
            cfg: cfg.clone(),
            distance,
        })
    }

    /// Apply the configured post-processing steps to a feature matrix.
    /// This reference engine carries no trained transformations, so the
    /// decomposition steps are skipped.
    fn post_process(&self, rows: &mut [Vec<f32>]) {
        for name in &self.cfg.post_processors.names {
            match name.as_str() {
                "L2Normalize" => l2_normalize(rows),
                other => debug!("post-processor `{other}` not handled by this engine, skipping"),
            }
        }
    }
}

impl QueryEngine for StandardQueryEngine {
    fn do_query(
        &self,
        query_fea: &[Vec<f32>],
        query_info: &[ItemInfo],
        gallery_fea: &[Vec<f32>],
    ) -> Result<QueryResults> {
        if query_fea.len() != query_info.len() {
            return Err(PipelineError::Feature(format!(
                "{} query rows but {} info entries",
                query_fea.len(),
                query_info.len()
            )));
        }

        let mut query_fea = query_fea.to_vec();
        let mut gallery_fea = gallery_fea.to_vec();
        self.post_process(&mut query_fea);
        self.post_process(&mut gallery_fea);

        let mut ranked = Vec::with_capacity(query_fea.len());
        for (row, info) in query_fea.iter().zip(query_info) {
            let mut scored: Vec<(usize, f32)> = gallery_fea
                .iter()
                .enumerate()
                .map(|(idx, gallery_row)| (idx, self.distance.similarity(row, gallery_row)))
                .collect();
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            if self.cfg.top_k > 0 {
                scored.truncate(self.cfg.top_k);
            }

            ranked.push(RankedList {
                query: info.clone(),
                indices: scored.iter().map(|(idx, _)| *idx).collect(),
                scores: scored.iter().map(|(_, score)| *score).collect(),
            });
        }

        Ok(QueryResults { ranked })
    }
}
