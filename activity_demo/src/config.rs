use std::{str::FromStr, time::Duration};

use activity_pipeline::LoaderConfig;
use anyhow::Context;
use models_activity::{ACTIVITY_INDEX, IndexSettings};
use opensearch_client::{ConnectionConfig, RetryPolicy};


#[derive(Debug, Clone)]
pub struct Config {
    /// How to reach the cluster
    pub connection: ConnectionConfig,

    /// The index the records are loaded into
    pub index: String,

    /// How many records to generate
    pub record_count: usize,

    /// Records are spread over the last `window_days` days
    pub window_days: u32,

    /// Batching of the bulk requests
    pub loader: LoaderConfig,

    /// Used when the index has to be created
    pub index_settings: IndexSettings,

    /// Seed for the record generator, entropy when unset
    pub seed: Option<u64>,
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {value}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("OPENSEARCH_HOST").unwrap_or_else(|| "localhost".to_string());
        let port: u16 = parse_or(&lookup, "OPENSEARCH_PORT", 9200)?;
        let scheme = lookup("OPENSEARCH_SCHEME").unwrap_or_else(|| "http".to_string());
        if scheme != "http" && scheme != "https" {
            anyhow::bail!("OPENSEARCH_SCHEME must be http or https, got {scheme}");
        }

        let credentials = match (lookup("OPENSEARCH_USERNAME"), lookup("OPENSEARCH_PASSWORD")) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            _ => anyhow::bail!(
                "OPENSEARCH_USERNAME and OPENSEARCH_PASSWORD must be provided together"
            ),
        };

        let ca_cert_pem = lookup("OPENSEARCH_CA_CERT")
            .map(|path| {
                std::fs::read(&path)
                    .with_context(|| format!("unable to read OPENSEARCH_CA_CERT {path}"))
            })
            .transpose()?;

        let timeout_seconds: u64 = parse_or(&lookup, "OPENSEARCH_TIMEOUT_SECONDS", 30)?;
        let retry = RetryPolicy {
            max_retries: parse_or(&lookup, "OPENSEARCH_MAX_RETRIES", 10)?,
            retry_on_timeout: parse_or(&lookup, "OPENSEARCH_RETRY_ON_TIMEOUT", true)?,
            ..Default::default()
        };

        let connection = ConnectionConfig {
            credentials,
            ca_cert_pem,
            timeout: Duration::from_secs(timeout_seconds),
            retry,
            ..ConnectionConfig::from_parts(&scheme, &host, port)
        };

        let loader = LoaderConfig {
            batch_size: parse_or(&lookup, "ACTIVITY_BATCH_SIZE", 500)?,
            concurrency: parse_or(&lookup, "ACTIVITY_BULK_CONCURRENCY", 1)?,
        };
        loader.validate().context("invalid bulk loader configuration")?;

        Ok(Config {
            connection,
            index: lookup("ACTIVITY_INDEX").unwrap_or_else(|| ACTIVITY_INDEX.to_string()),
            record_count: parse_or(&lookup, "ACTIVITY_RECORD_COUNT", 150)?,
            window_days: parse_or(&lookup, "ACTIVITY_WINDOW_DAYS", 7)?,
            loader,
            index_settings: IndexSettings {
                number_of_shards: parse_or(&lookup, "ACTIVITY_SHARDS", 1)?,
                number_of_replicas: parse_or(&lookup, "ACTIVITY_REPLICAS", 1)?,
            },
            seed: lookup("ACTIVITY_SEED")
                .map(|seed| {
                    seed.trim()
                        .parse::<u64>()
                        .context("ACTIVITY_SEED must be an integer")
                })
                .transpose()?,
        })
    }
}
