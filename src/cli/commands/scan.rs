//! Scan command implementation.

use anyhow::{Context, Result};
use signal_config::{AppConfig, DataSettings};
use signal_data::{CachedFundamentals, CsvFundamentals, CsvMarketData, CsvTextStore, SnapshotWriter};
use signal_engine::{Collaborators, SignalEngine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    info!("Starting scan for strategy: {}", args.strategy);

    let sources = collaborators(&config.data).await?;
    let engine = SignalEngine::new(config.engine_config(), sources)
        .context("Failed to build signal engine")?;

    let batch = engine.compute_signals(args.strategy, &args.symbols).await?;

    match args.output {
        OutputFormat::Json => println!("{}", batch.to_json()?),
        OutputFormat::Text => println!("{}", batch.summary()),
    }

    if !args.no_persist {
        let mut writer = SnapshotWriter::new(
            &config.data.output_dir,
            format!("signals_{}", batch.strategy),
        );
        let rows = batch.rows()?;
        let paths = writer
            .write(&rows, batch.generated_at)
            .context("Failed to write signal snapshot")?;
        info!("Snapshot saved to {:?}", paths.latest);
    }

    Ok(())
}

/// File-backed collaborators from the data settings.
async fn collaborators(data: &DataSettings) -> Result<Collaborators> {
    if !data.price_dir.is_dir() {
        warn!(
            "Price directory '{}' does not exist; every symbol will be reported as NO_DATA",
            data.price_dir.display()
        );
    }

    let fundamentals = if data.fundamentals_path.exists() {
        CsvFundamentals::load(&data.fundamentals_path)
            .await
            .with_context(|| format!("Failed to load {}", data.fundamentals_path.display()))?
    } else {
        warn!(
            "Fundamentals file '{}' not found; sector and earnings gates will not fire",
            data.fundamentals_path.display()
        );
        CsvFundamentals::default()
    };

    let texts = CsvTextStore::new(&data.texts_path)?;

    Ok(Collaborators {
        market: Arc::new(CsvMarketData::new(&data.price_dir)),
        texts: Arc::new(texts),
        fundamentals: Arc::new(CachedFundamentals::new(
            fundamentals,
            Duration::from_secs(data.fundamentals_ttl_secs),
        )),
    })
}
