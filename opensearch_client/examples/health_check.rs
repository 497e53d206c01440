use activity_entrypoint::Entrypoint;
use anyhow::Context;
use opensearch_client::{ConnectionConfig, OpensearchClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Entrypoint::default().init();

    let host = std::env::var("OPENSEARCH_HOST").context("OPENSEARCH_HOST not set")?;
    let port = std::env::var("OPENSEARCH_PORT")
        .unwrap_or_else(|_| "9200".to_string())
        .parse()
        .context("OPENSEARCH_PORT must be a port number")?;
    let scheme = std::env::var("OPENSEARCH_SCHEME").unwrap_or_else(|_| "http".to_string());

    let mut config = ConnectionConfig::from_parts(&scheme, &host, port);
    if let (Ok(username), Ok(password)) = (
        std::env::var("OPENSEARCH_USERNAME"),
        std::env::var("OPENSEARCH_PASSWORD"),
    ) {
        config.credentials = Some((username, password));
    }

    let client = OpensearchClient::new(config)?;

    println!("Client created");

    if let Err(e) = client.ping().await {
        println!("Unable to connect to OpenSearch: {e}");
        return Err(e.into());
    }

    let info = client.info().await?;
    println!(
        "OpenSearch health check passed. cluster: {} version: {}",
        info.cluster_name, info.version.number
    );

    Ok(())
}
