//! List strategies command.

use anyhow::{Context, Result};
use signal_strategies::StrategyRegistry;

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new().context("Failed to build strategy registry")?;

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {} ({})", info.name, info.kind);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        if info.requires_symbols {
            println!("  Requires --symbols");
        }
        println!("  Defaults: {}", info.default_config);
        println!();
    }

    println!("Use scan --strategy <name> to compute signals.");

    Ok(())
}
