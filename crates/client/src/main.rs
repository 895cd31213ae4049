//! `spellcast` replays scripted ability triggers.
//!
//! ```bash
//! spellcast demos/catalog.toml demos/scenario.toml
//! spellcast demos/catalog.toml demos/scenario.toml --json
//! RUST_LOG=debug spellcast demos/catalog.toml demos/scenario.toml --log-dir /tmp/spellcast
//! ```

use std::path::PathBuf;

use ability_client::{Replay, ScenarioLoader, logging};
use ability_content::CatalogLoader;
use ability_runtime::RuntimeConfig;
use anyhow::Result;
use clap::Parser;

/// Replay ability triggers against a catalog
#[derive(Parser)]
#[command(name = "spellcast")]
#[command(about = "Replay ability triggers against a catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Ability catalog (TOML)
    catalog: PathBuf,

    /// Trigger scenario (TOML)
    scenario: PathBuf,

    /// Print one JSON object per step instead of text
    #[arg(long)]
    json: bool,

    /// Also write logs to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.log_dir.as_deref())?;

    let catalog = CatalogLoader::load(&cli.catalog)?;
    let scenario = ScenarioLoader::load(&cli.scenario)?;
    let config = RuntimeConfig::from_env();

    tracing::info!(
        abilities = catalog.abilities.len(),
        steps = scenario.steps.len(),
        window_ms = config.debounce_window().as_millis() as u64,
        "starting replay"
    );

    let mut replay = Replay::new(catalog, config)?;
    for report in replay.run(&scenario).await? {
        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print!("{report}");
        }
    }

    Ok(())
}
