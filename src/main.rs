use std::sync::Arc;

use airport_atlas::{Atlas, AtlasConfig, telemetry, web};
use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AtlasConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    info!("Starting airport-atlas {}", airport_atlas::VERSION);

    let atlas = Arc::new(Atlas::new(&config).context("Failed to set up the atlas")?);

    // Build the index up front so a missing dataset stops the process here
    let index = atlas
        .index()
        .with_context(|| format!("Failed to load reference data from {}", config.data.directory))?;
    info!(
        "Serving {} airports in {} countries",
        index.len(),
        index.country_count()
    );

    web::run(&config, atlas).await
}
