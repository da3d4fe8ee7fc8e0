mod config;
mod export;
mod metrics;
mod summary;

use anyhow::{Context, Result};
use categorize::EntityCategorizer;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, LogFormat, LoggingConfig};
use export::{CATEGORIZED_STEM, SUMMARY_STEM};
use metrics::{Metrics, TimedOperation};
use summary::RunSummary;

/// Assign fine-grained categories to extracted biomedical entities.
#[derive(Parser, Debug)]
#[command(name = "categorize-entities", version, about)]
struct Args {
    /// Entity table (.csv/.tsv) or a directory of them
    #[arg(long)]
    entities: PathBuf,

    /// Vaccine tracker table with "Product Category" and "Product Description"
    #[arg(long)]
    catalog: PathBuf,

    /// Output directory (created if missing)
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the fuzzy match threshold (0-100)
    #[arg(long)]
    threshold: Option<u8>,

    /// Categorize rows across threads
    #[arg(long)]
    parallel: bool,
}

fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.categorize.fuzzy_threshold = threshold;
    }
    if args.parallel {
        config.categorize.parallel = true;
    }
    config.validate()?;

    init_tracing(&config.logging)?;

    let metrics = Metrics::new();

    // Load
    let timer = TimedOperation::start();
    let catalog = ingest::load_catalog(&args.catalog).await?;
    let entities = ingest::ingest_entities(&args.entities).await?;
    metrics.record_load(timer.elapsed(), entities.len());
    info!(
        entities = entities.len(),
        products = catalog.product_count(),
        "Inputs loaded"
    );

    // Categorize
    let categorizer = EntityCategorizer::with_threshold(catalog, config.categorize.fuzzy_threshold)?;
    let timer = TimedOperation::start();
    let outcome = if config.categorize.parallel {
        categorizer.categorize_parallel(&entities)
    } else {
        categorizer.categorize(&entities)
    };
    metrics.record_categorize(timer.elapsed());

    // Export
    tokio::fs::create_dir_all(&args.output)
        .await
        .context(format!("Failed to create output directory: {:?}", args.output))?;
    let date = config
        .output
        .date_stamp
        .then(|| chrono::Local::now().date_naive());

    let timer = TimedOperation::start();
    let table_path = export::output_path(&args.output, CATEGORIZED_STEM, "csv", date);
    export::write_categorized(&table_path, &outcome.rows)?;
    metrics.record_export(timer.elapsed(), outcome.rows.len());

    if config.output.write_summary {
        let summary = RunSummary::build(
            &entities,
            &outcome,
            config.categorize.fuzzy_threshold,
            metrics.snapshot(),
        );
        let summary_path = export::output_path(&args.output, SUMMARY_STEM, "json", date);
        export::write_summary(&summary_path, &summary)?;
    }

    let snapshot = metrics.snapshot();
    info!(
        rows = snapshot.rows_written,
        passthrough = outcome.passthrough.len(),
        load_ms = snapshot.load_time_ms,
        categorize_ms = snapshot.categorize_time_ms,
        export_ms = snapshot.export_time_ms,
        "Categorization complete"
    );

    Ok(())
}
