//! Searches and aggregations run against the loaded index once it has been refreshed.
//! Query bodies and formatting are kept apart from the network calls so both can be tested
//! without a cluster.

use activity_pipeline::{BulkLoader, DocumentStore, PipelineError};
use anyhow::Context;
use opensearch_client::search::SearchResponse;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

#[cfg(test)]
mod test;

/// A titled block of output lines
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        for line in &self.lines {
            writeln!(f, "   {line}")?;
        }
        Ok(())
    }
}

/// The fields of a hit the search reports print.
/// Each is kept as raw json and may be missing, so documents written by other tools
/// in a different shape still show up.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HitSummary {
    pub timestamp: Value,
    pub user_name: Value,
    pub action: Value,
    pub status: Value,
    pub response_time: Value,
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        other => other.to_string(),
    }
}

/// second precision, whatever the stored form
fn short_timestamp(value: &Value) -> String {
    text(value).chars().take(19).collect()
}

#[derive(Debug, Deserialize)]
pub struct Buckets<B> {
    pub buckets: Vec<B>,
}

#[derive(Debug, Deserialize)]
pub struct MetricValue {
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TermBucket {
    pub key: String,
    pub doc_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ResponseTimeBucket {
    pub key: String,
    pub doc_count: u64,
    pub avg_response_time: MetricValue,
}

#[derive(Debug, Deserialize)]
pub struct DayBucket {
    pub key_as_string: String,
    pub doc_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SessionBucket {
    pub key: String,
    pub doc_count: u64,
    pub total_session_time: MetricValue,
}

pub mod queries {
    use super::*;

    pub fn recent_activity() -> Value {
        json!({
            "query": { "match_all": {} },
            "size": 5,
            "sort": [{ "timestamp": { "order": "desc" } }]
        })
    }

    pub fn engineering_activity() -> Value {
        json!({
            "query": { "term": { "department": "engineering" } },
            "size": 3
        })
    }

    pub fn failed_actions() -> Value {
        json!({
            "query": {
                "bool": {
                    "must": [{ "term": { "status": "failed" } }]
                }
            },
            "size": 5
        })
    }

    pub fn by_department() -> Value {
        json!({
            "size": 0,
            "aggs": {
                "by_department": { "terms": { "field": "department" } }
            }
        })
    }

    pub fn response_time_by_action() -> Value {
        json!({
            "size": 0,
            "aggs": {
                "by_action": {
                    "terms": { "field": "action" },
                    "aggs": {
                        "avg_response_time": { "avg": { "field": "response_time" } }
                    }
                }
            }
        })
    }

    pub fn status_distribution() -> Value {
        json!({
            "size": 0,
            "aggs": {
                "status_distribution": { "terms": { "field": "status" } }
            }
        })
    }

    pub fn daily_activity() -> Value {
        json!({
            "size": 0,
            "aggs": {
                "daily_activity": {
                    "date_histogram": {
                        "field": "timestamp",
                        "calendar_interval": "day",
                        "format": "yyyy-MM-dd"
                    }
                }
            }
        })
    }

    pub fn session_time_by_user() -> Value {
        json!({
            "size": 0,
            "aggs": {
                "top_users": {
                    "terms": { "field": "user_name.keyword" },
                    "aggs": {
                        "total_session_time": { "sum": { "field": "session_duration" } }
                    }
                }
            }
        })
    }
}

pub fn format_recent(hits: &[HitSummary]) -> Vec<String> {
    hits.iter()
        .map(|h| {
            format!(
                "{} | {} | {} | {}",
                short_timestamp(&h.timestamp),
                text(&h.user_name),
                text(&h.action),
                text(&h.status)
            )
        })
        .collect()
}

pub fn format_engineering(total: i64, hits: &[HitSummary]) -> Vec<String> {
    std::iter::once(format!("Found {total} engineering users"))
        .chain(
            hits.iter()
                .map(|h| format!("{} - {}", text(&h.user_name), text(&h.action))),
        )
        .collect()
}

pub fn format_failed(total: i64, hits: &[HitSummary]) -> Vec<String> {
    std::iter::once(format!("Found {total} failed actions"))
        .chain(hits.iter().map(|h| {
            format!(
                "{} - {} - {}ms",
                text(&h.user_name),
                text(&h.action),
                text(&h.response_time)
            )
        }))
        .collect()
}

pub fn format_departments(buckets: &[TermBucket]) -> Vec<String> {
    buckets
        .iter()
        .map(|b| format!("{}: {} actions", b.key, b.doc_count))
        .collect()
}

pub fn format_response_times(buckets: &[ResponseTimeBucket]) -> Vec<String> {
    buckets
        .iter()
        .map(|b| {
            format!(
                "{}: {:.2}ms average ({} samples)",
                b.key,
                b.avg_response_time.value.unwrap_or_default(),
                b.doc_count
            )
        })
        .collect()
}

pub fn format_status_distribution(buckets: &[TermBucket]) -> Vec<String> {
    let total: u64 = buckets.iter().map(|b| b.doc_count).sum();
    buckets
        .iter()
        .map(|b| {
            let percentage = if total == 0 {
                0.0
            } else {
                b.doc_count as f64 / total as f64 * 100.0
            };
            format!("{}: {} ({percentage:.1}%)", b.key, b.doc_count)
        })
        .collect()
}

pub fn format_daily_activity(buckets: &[DayBucket]) -> Vec<String> {
    buckets
        .iter()
        .map(|b| format!("{}: {} activities", b.key_as_string, b.doc_count))
        .collect()
}

pub fn format_session_time(buckets: &[SessionBucket]) -> Vec<String> {
    buckets
        .iter()
        .map(|b| {
            let hours = b.total_session_time.value.unwrap_or_default() / 3600.0;
            format!("{}: {hours:.1} hours total ({} sessions)", b.key, b.doc_count)
        })
        .collect()
}

/// Pull the buckets of the named aggregation out of a response
pub fn buckets<B: DeserializeOwned>(
    response: &SearchResponse<Value>,
    name: &str,
) -> anyhow::Result<Vec<B>> {
    let aggregation = response
        .aggregations
        .as_ref()
        .and_then(|aggs| aggs.get(name))
        .with_context(|| format!("response has no {name} aggregation"))?;

    let parsed: Buckets<B> = serde_json::from_value(aggregation.clone())
        .with_context(|| format!("unexpected shape of the {name} aggregation"))?;
    Ok(parsed.buckets)
}

/// Runs every report against `index` in a fixed order
pub struct Reporter<'a, S> {
    loader: &'a BulkLoader<S>,
    index: &'a str,
}

impl<'a, S> Reporter<'a, S>
where
    S: DocumentStore,
    PipelineError: From<S::Err>,
{
    pub fn new(loader: &'a BulkLoader<S>, index: &'a str) -> Self {
        Self { loader, index }
    }

    async fn search<T: DeserializeOwned>(&self, body: Value) -> anyhow::Result<SearchResponse<T>> {
        let response = self.loader.search(self.index, body).await?;
        serde_json::from_value(response).context("unable to parse search response")
    }

    async fn hits(&self, body: Value) -> anyhow::Result<(i64, Vec<HitSummary>)> {
        let response = self.search::<HitSummary>(body).await?;
        let total = response.total();
        Ok((total, response.into_sources().collect()))
    }

    async fn aggregation<B: DeserializeOwned>(
        &self,
        body: Value,
        name: &str,
    ) -> anyhow::Result<Vec<B>> {
        let response = self.search::<Value>(body).await?;
        buckets(&response, name)
    }

    #[tracing::instrument(err, skip(self), fields(index = self.index))]
    pub async fn searches(&self) -> anyhow::Result<Vec<Section>> {
        let (_, recent) = self.hits(queries::recent_activity()).await?;
        let (engineering_total, engineering) =
            self.hits(queries::engineering_activity()).await?;
        let (failed_total, failed) = self.hits(queries::failed_actions()).await?;

        Ok(vec![
            Section {
                title: "1. Match all documents (first 5):",
                lines: format_recent(&recent),
            },
            Section {
                title: "2. Search for engineering department users:",
                lines: format_engineering(engineering_total, &engineering),
            },
            Section {
                title: "3. Failed actions:",
                lines: format_failed(failed_total, &failed),
            },
        ])
    }

    #[tracing::instrument(err, skip(self), fields(index = self.index))]
    pub async fn aggregations(&self) -> anyhow::Result<Vec<Section>> {
        let departments: Vec<TermBucket> = self
            .aggregation(queries::by_department(), "by_department")
            .await?;
        let response_times: Vec<ResponseTimeBucket> = self
            .aggregation(queries::response_time_by_action(), "by_action")
            .await?;
        let statuses: Vec<TermBucket> = self
            .aggregation(queries::status_distribution(), "status_distribution")
            .await?;
        let days: Vec<DayBucket> = self
            .aggregation(queries::daily_activity(), "daily_activity")
            .await?;
        let sessions: Vec<SessionBucket> = self
            .aggregation(queries::session_time_by_user(), "top_users")
            .await?;

        Ok(vec![
            Section {
                title: "1. Count by Department:",
                lines: format_departments(&departments),
            },
            Section {
                title: "2. Average Response Time by Action:",
                lines: format_response_times(&response_times),
            },
            Section {
                title: "3. Status Distribution:",
                lines: format_status_distribution(&statuses),
            },
            Section {
                title: "4. Daily Activity Histogram:",
                lines: format_daily_activity(&days),
            },
            Section {
                title: "5. Top Users by Total Session Duration:",
                lines: format_session_time(&sessions),
            },
        ])
    }
}
