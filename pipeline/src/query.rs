use crate::error::Result;
use crate::features::ItemInfo;

/// Gallery ranking for a single query item, best match first
#[derive(Debug, Clone)]
pub struct RankedList {
    pub query: ItemInfo,

    /// Indices into the gallery, ordered by decreasing similarity
    pub indices: Vec<usize>,

    /// Similarity score per ranked index
    pub scores: Vec<f32>,
}

/// Output of the query stage for a whole query split
#[derive(Debug, Clone, Default)]
pub struct QueryResults {
    pub ranked: Vec<RankedList>,
}

/// The query/ranking stage, constructed from an effective query config
pub trait QueryEngine {
    fn do_query(
        &self,
        query_fea: &[Vec<f32>],
        query_info: &[ItemInfo],
        gallery_fea: &[Vec<f32>],
    ) -> Result<QueryResults>;
}
