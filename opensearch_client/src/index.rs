use opensearch::{
    http::StatusCode,
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetMappingParts,
        IndicesRefreshParts,
    },
};

use crate::{
    OpensearchClient, Result,
    error::{OpensearchClientError, ResponseExt, read_json},
};

impl OpensearchClient {
    /// Checks if the index exists
    #[tracing::instrument(skip(self), err)]
    pub async fn index_exists(&self, index_name: &str) -> Result<bool> {
        let response = self
            .retry
            .send("index_exists", move || async move {
                self.inner
                    .indices()
                    .exists(IndicesExistsParts::Index(&[index_name]))
                    .send()
                    .await
            })
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        response.map_client_error("index_exists").await?;
        Ok(true)
    }

    /// Creates the index with the provided body.
    /// Fails with [OpensearchClientError::IndexAlreadyExists] if the index was created in the
    /// meantime by someone else.
    #[tracing::instrument(skip(self, index_body), err)]
    pub async fn create_index(&self, index_name: &str, index_body: serde_json::Value) -> Result<()> {
        tracing::info!(index_body=?index_body, "creating index");

        let response = self
            .retry
            .send("create_index", move || {
                let body = index_body.clone();
                async move {
                    self.inner
                        .indices()
                        .create(IndicesCreateParts::Index(index_name))
                        .body(body)
                        .send()
                        .await
                }
            })
            .await?;

        match response.map_client_error("create_index").await {
            Ok(_) => Ok(()),
            Err(OpensearchClientError::NetworkError {
                status_code,
                message,
            }) if status_code == StatusCode::BAD_REQUEST.as_u16()
                && message.contains("resource_already_exists_exception") =>
            {
                Err(OpensearchClientError::IndexAlreadyExists {
                    index: index_name.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the top level `properties` object of the index mapping.
    /// An index without any mapped fields yields an empty object.
    #[tracing::instrument(skip(self), err)]
    pub async fn index_properties(&self, index_name: &str) -> Result<serde_json::Value> {
        let response = self
            .retry
            .send("index_properties", move || async move {
                self.inner
                    .indices()
                    .get_mapping(IndicesGetMappingParts::Index(&[index_name]))
                    .send()
                    .await
            })
            .await?
            .map_client_error("index_properties")
            .await?;

        let body: serde_json::Value = read_json(response, "index_properties").await?;
        Ok(properties_of(&body, index_name))
    }

    /// Makes everything written to the index so far visible to search
    #[tracing::instrument(skip(self), err)]
    pub async fn refresh_index(&self, index_name: &str) -> Result<()> {
        self.retry
            .send("refresh_index", move || async move {
                self.inner
                    .indices()
                    .refresh(IndicesRefreshParts::Index(&[index_name]))
                    .send()
                    .await
            })
            .await?
            .map_client_error("refresh_index")
            .await?;

        tracing::debug!(index = %index_name, "index refreshed");
        Ok(())
    }

    /// Deletes the index. Returns false when there was no such index.
    #[tracing::instrument(skip(self), err)]
    pub async fn delete_index(&self, index_name: &str) -> Result<bool> {
        let response = self
            .retry
            .send("delete_index", move || async move {
                self.inner
                    .indices()
                    .delete(IndicesDeleteParts::Index(&[index_name]))
                    .send()
                    .await
            })
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response.map_client_error("delete_index").await?;

        tracing::debug!(index = %index_name, "index deleted");
        Ok(true)
    }
}

/// The get mapping response is keyed by the concrete index name, which differs from the
/// requested name when an alias was used. Take the only entry in that case.
fn properties_of(body: &serde_json::Value, index_name: &str) -> serde_json::Value {
    let index = match (body.get(index_name), body.as_object()) {
        (Some(index), _) => index,
        (None, Some(map)) if map.len() == 1 => map.values().next().unwrap_or(body),
        _ => body,
    };

    match &index["mappings"]["properties"] {
        serde_json::Value::Object(props) => serde_json::Value::Object(props.clone()),
        _ => serde_json::json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionConfig, RetryPolicy, stub_server::serve_status};

    fn client(url: String) -> OpensearchClient {
        OpensearchClient::new(ConnectionConfig {
            url,
            retry: RetryPolicy {
                max_retries: 0,
                ..Default::default()
            },
            ..ConnectionConfig::from_parts("http", "127.0.0.1", 1)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_delete_index() {
        let deleted = client(serve_status("200 OK").await);
        assert!(deleted.delete_index("user_activity_logs").await.unwrap());

        let missing = client(serve_status("404 Not Found").await);
        assert!(!missing.delete_index("user_activity_logs").await.unwrap());

        let forbidden = client(serve_status("403 Forbidden").await);
        let err = forbidden
            .delete_index("user_activity_logs")
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                OpensearchClientError::NetworkError {
                    status_code: 403,
                    ..
                }
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_properties_of_named_index() {
        let body = serde_json::json!({
            "user_activity_logs": {
                "mappings": {
                    "properties": {
                        "timestamp": { "type": "date" },
                        "location": { "type": "geo_point" }
                    }
                }
            }
        });

        assert_eq!(
            properties_of(&body, "user_activity_logs"),
            serde_json::json!({
                "timestamp": { "type": "date" },
                "location": { "type": "geo_point" }
            })
        );
    }

    #[test]
    fn test_properties_of_alias() {
        let body = serde_json::json!({
            "user_activity_logs-000001": {
                "mappings": { "properties": { "status": { "type": "keyword" } } }
            }
        });

        let props = properties_of(&body, "user_activity_logs");
        assert_eq!(props["status"]["type"], "keyword");
    }

    #[test]
    fn test_properties_of_empty_mapping() {
        let body = serde_json::json!({ "fresh": { "mappings": {} } });
        assert_eq!(properties_of(&body, "fresh"), serde_json::json!({}));
    }
}
