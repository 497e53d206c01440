pub mod bulk;
pub mod error;
pub mod index;
pub mod retry;
pub mod search;

#[cfg(test)]
mod stub_server;

pub use bulk::BulkItemOutcome;
pub use retry::RetryPolicy;

pub type Result<T> = std::result::Result<T, error::OpensearchClientError>;

use std::time::Duration;

use opensearch::{
    OpenSearch,
    auth::Credentials,
    cert::{Certificate, CertificateValidation},
    http::{
        Url,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
};

use crate::error::ResponseExt;

/// Everything needed to build an [OpensearchClient]
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// e.g. `http://localhost:9200`
    pub url: String,
    /// basic auth username and password
    pub credentials: Option<(String, String)>,
    /// PEM encoded CA certificate used to validate the server
    pub ca_cert_pem: Option<Vec<u8>>,
    /// per request deadline
    pub timeout: Duration,
    /// how requests are retried on transient failures
    pub retry: RetryPolicy,
}

impl ConnectionConfig {
    /// builds `scheme://host:port`
    pub fn from_parts(scheme: &str, host: &str, port: u16) -> Self {
        Self {
            url: format!("{scheme}://{host}:{port}"),
            credentials: None,
            ca_cert_pem: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Name and version of the cluster we are connected to
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: ClusterVersion,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ClusterVersion {
    pub number: String,
    #[serde(default)]
    pub distribution: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OpensearchClient {
    /// The opensearch client used to interact with opensearch api
    inner: opensearch::OpenSearch,
    retry: RetryPolicy,
}

impl OpensearchClient {
    pub fn new(config: ConnectionConfig) -> anyhow::Result<Self> {
        let url = Url::parse(&config.url)?;
        let conn_pool = SingleNodeConnectionPool::new(url);

        let cert_validation = match &config.ca_cert_pem {
            Some(pem) => CertificateValidation::Full(Certificate::from_pem(pem)?),
            None if config.url.contains("https://localhost") => CertificateValidation::None,
            None => CertificateValidation::Default,
        };

        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .cert_validation(cert_validation)
            .timeout(config.timeout);

        if let Some((username, password)) = config.credentials {
            builder = builder.auth(Credentials::Basic(username, password));
        }

        let client = OpenSearch::new(builder.build()?);
        Ok(Self {
            inner: client,
            retry: config.retry,
        })
    }

    /// Liveness check against the cluster root
    #[tracing::instrument(skip(self), err)]
    pub async fn ping(&self) -> Result<()> {
        self.retry
            .send("ping", move || async move { self.inner.ping().send().await })
            .await?
            .map_client_error("ping")
            .await?;
        Ok(())
    }

    /// Name and version of the cluster
    #[tracing::instrument(skip(self), err)]
    pub async fn info(&self) -> Result<ClusterInfo> {
        let response = self
            .retry
            .send("info", move || async move { self.inner.info().send().await })
            .await?
            .map_client_error("info")
            .await?;

        error::read_json(response, "info").await
    }
}
