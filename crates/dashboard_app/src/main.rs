mod terminal;

use std::path::PathBuf;

use anyhow::Context;
use engine_logging::engine_info;

use terminal::config::{self, DEFAULT_CONFIG_FILE};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if !engine_logging::initialize(config.log_destination.into(), config.log_level.into()) {
        eprintln!("Logging unavailable, continuing without it.");
    }
    engine_info!("dashboard_app starting against {}", config.api_base_url);

    terminal::run_app(config)
}
