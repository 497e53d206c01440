
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: T,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Total {
    pub value: i64,
    pub relation: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Hits<T> {
    pub total: Total,
    pub max_score: Option<f64>,
    pub hits: Vec<Hit<T>>,
}

/// A search response. Aggregations are left untyped since their shape depends on the
/// request that produced them.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse<T> {
    pub took: i64,
    pub timed_out: bool,
    pub hits: Hits<T>,
    #[serde(default)]
    pub aggregations: Option<serde_json::Value>,
}

impl<T> SearchResponse<T> {
    /// the `_source` of every hit, in rank order
    pub fn into_sources(self) -> impl Iterator<Item = T> {
        self.hits.hits.into_iter().map(|hit| hit.source)
    }

    /// total number of matching documents
    pub fn total(&self) -> i64 {
        self.hits.total.value
    }
}
