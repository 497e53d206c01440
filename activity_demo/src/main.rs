use activity_entrypoint::Entrypoint;
use activity_generator::{DefaultTime, GeneratorConfig, TimeWindow, generate};
use activity_pipeline::BulkLoader;
use anyhow::Context;
use config::Config;
use models_activity::{activity_index_schema, default_population};
use opensearch_client::OpensearchClient;
use rand::{SeedableRng, rngs::StdRng};
use report::Reporter;

mod config;
mod report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Entrypoint::default().init();

    if let Err(e) = run().await {
        tracing::error!(error=?e, "activity demo failed");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("expected to be able to generate config")?;
    tracing::trace!("initialized config");

    let client = OpensearchClient::new(config.connection.clone())
        .context("unable to create opensearch client")?;

    let loader = BulkLoader::new(client, config.loader)?;
    loader
        .ping()
        .await
        .context("error connecting to opensearch")?;

    let info = loader.store().info().await?;
    tracing::info!(cluster_name=%info.cluster_name, version=%info.version.number, "connected");
    println!("Connected to OpenSearch successfully!");
    println!("Cluster info: {}", info.cluster_name);

    let schema = activity_index_schema(config.index_settings);
    let created = loader.ensure_collection(&config.index, &schema).await?;
    if created {
        println!("Index '{}' created successfully", config.index);
    } else {
        println!("Index '{}' already exists, skipping creation", config.index);
    }

    println!("\nGenerating sample data...");
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let window = TimeWindow::last_days(&DefaultTime, config.window_days)?;
    let records = generate(
        &mut rng,
        config.record_count,
        &window,
        &default_population(),
        &GeneratorConfig::default(),
    )?;

    println!("Inserting data into OpenSearch...");
    let result = loader.submit(&config.index, records).await?;
    println!("Successfully inserted {} documents", result.accepted);
    if !result.rejected.is_empty() {
        println!("Failed to insert {} documents", result.rejected.len());
        for rejected in &result.rejected {
            tracing::warn!(
                user_id=%rejected.record.user_id,
                reason=%rejected.reason,
                "document rejected"
            );
        }
    }

    loader.refresh(&config.index).await?;

    let reporter = Reporter::new(&loader, &config.index);

    println!("\n=== SEARCH OPERATIONS ===");
    print_sections(&reporter.searches().await?);

    println!("\n=== AGGREGATION OPERATIONS ===");
    print_sections(&reporter.aggregations().await?);

    println!("\n=== OPENSEARCH OPERATIONS COMPLETED SUCCESSFULLY ===");
    Ok(())
}

fn print_sections(sections: &[report::Section]) {
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{section}");
    }
}
