use crate::{
    OpensearchClient, Result,
    error::{ResponseExt, read_json},
};

pub mod model;

pub use model::{Hit, Hits, SearchResponse, Total};

impl OpensearchClient {
    /// Runs a search with the given body against the index and returns the raw response.
    /// The body is forwarded as is.
    #[tracing::instrument(skip(self, body), err)]
    pub async fn search_raw(
        &self,
        index_name: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let response = self
            .retry
            .send("search", move || {
                let body = body.clone();
                async move {
                    self.inner
                        .search(opensearch::SearchParts::Index(&[index_name]))
                        .body(body)
                        .send()
                        .await
                }
            })
            .await?
            .map_client_error("search")
            .await?;

        read_json(response, "search").await
    }
}
