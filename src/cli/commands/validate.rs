//! Validate configuration command.

use anyhow::Result;
use signal_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating built-in defaults and SIGNALS__* overrides"),
    }

    if let Err(e) = config.engine_config().validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("Log level: {}", config.logging.level);
    println!("Price directory: {}", config.data.price_dir.display());
    println!("Text corpus: {}", config.data.texts_path.display());
    println!("Output directory: {}", config.data.output_dir.display());
    println!("Default universe: {}", config.engine.default_universe.join(", "));
    println!(
        "Thresholds: strong {} / weak {}",
        config.engine.strong_threshold, config.engine.weak_threshold
    );
    println!(
        "Risk per trade: {} of {} (ATR x{})",
        config.risk.max_risk_pct_per_trade, config.risk.account_equity, config.risk.atr_k
    );

    Ok(())
}
