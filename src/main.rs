// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-Tracker importer
//!
//! Checks the downloads folder for a new Health export and loads any new
//! runs into MySQL. Prints a JSON report of what happened.

use anyhow::Context;
use run_tracker::{config::Config, db::MySqlStore, services::ImportPipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        table = %config.table,
        downloads = %config.downloads_dir.display(),
        "Starting Run-Tracker import"
    );

    let store = MySqlStore::connect(&config.database_url)
        .await
        .context("Failed to connect to MySQL")?;

    let pipeline = ImportPipeline::new(config, store);
    let result = pipeline.run().await;
    pipeline.store().close().await;

    let report = result.context("Import failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("run_tracker=debug,info")),
        )
        .with(format)
        .init();
}
