use serde_json::Value;

use crate::{
    OpensearchClient, Result,
    error::{OpensearchClientError, ResponseExt, read_json},
};


/// What happened to one document of a bulk request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkItemOutcome {
    /// The document was stored under the server assigned id
    Indexed { id: String },
    /// The document was refused, the rest of the request is unaffected
    Rejected { status: u16, reason: String },
}

impl BulkItemOutcome {
    pub fn is_indexed(&self) -> bool {
        matches!(self, BulkItemOutcome::Indexed { .. })
    }
}

fn build_bulk_body(documents: &[Value]) -> Result<Vec<String>> {
    let action = serde_json::json!({ "index": {} }).to_string();
    let mut bulk_body = Vec::with_capacity(documents.len() * 2);

    for doc in documents {
        bulk_body.push(action.clone());
        bulk_body.push(serde_json::to_string(doc).map_err(|e| {
            OpensearchClientError::SerializationFailed {
                details: e.to_string(),
                method: Some("bulk_index".to_string()),
            }
        })?);
    }

    Ok(bulk_body)
}

fn item_outcome(item: &Value) -> BulkItemOutcome {
    // each item is keyed by its action type, we only ever send `index`
    let result = item
        .as_object()
        .and_then(|actions| actions.values().next())
        .unwrap_or(&Value::Null);

    let status = result["status"].as_u64().unwrap_or(0);
    match status {
        200..=299 => BulkItemOutcome::Indexed {
            id: result["_id"].as_str().unwrap_or_default().to_string(),
        },
        _ => {
            let error = &result["error"];
            let reason = match (error["type"].as_str(), error["reason"].as_str()) {
                (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
                (None, Some(reason)) => reason.to_string(),
                (Some(kind), None) => kind.to_string(),
                (None, None) => format!("document rejected with status {status}"),
            };
            BulkItemOutcome::Rejected {
                status: u16::try_from(status).unwrap_or(0),
                reason,
            }
        }
    }
}

fn parse_bulk_response(response: &Value, expected: usize) -> Result<Vec<BulkItemOutcome>> {
    let items = response["items"].as_array().ok_or_else(|| {
        OpensearchClientError::DeserializationFailed {
            details: "bulk response has no items".to_string(),
            method: Some("bulk_index".to_string()),
        }
    })?;

    if items.len() != expected {
        return Err(OpensearchClientError::DeserializationFailed {
            details: format!(
                "bulk response has {} items for {expected} documents",
                items.len()
            ),
            method: Some("bulk_index".to_string()),
        });
    }

    Ok(items.iter().map(item_outcome).collect())
}

impl OpensearchClient {
    /// Indexes all documents with a single bulk request.
    /// Returns one outcome per document, in the order the documents were given.
    /// Per document failures are reported as [BulkItemOutcome::Rejected], only a failure of
    /// the request as a whole is an error.
    #[tracing::instrument(skip(self, documents), fields(documents = documents.len()), err)]
    pub async fn bulk_index(
        &self,
        index_name: &str,
        documents: &[Value],
    ) -> Result<Vec<BulkItemOutcome>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let bulk_body = build_bulk_body(documents)?;

        let response = self
            .retry
            .send("bulk_index", move || {
                let body = bulk_body.clone();
                async move {
                    self.inner
                        .bulk(opensearch::BulkParts::Index(index_name))
                        .body(body)
                        .send()
                        .await
                }
            })
            .await?
            .map_client_error("bulk_index")
            .await?;

        let response_body: Value = read_json(response, "bulk_index").await?;
        let outcomes = parse_bulk_response(&response_body, documents.len())?;

        tracing::trace!(
            total = documents.len(),
            indexed = outcomes.iter().filter(|o| o.is_indexed()).count(),
            "bulk index completed"
        );

        Ok(outcomes)
    }
}
