//! Simulation binary for the INSEEDS farming model.
//!
//! This is the main entry point that wires together configuration, the
//! synthetic landscape, agent initialisation, the tick loop, and the
//! output table.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `inseeds-config.yaml` (or `$INSEEDS_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Generate the synthetic landscape
//! 4. Create farmers, decision makers, and lobby groups
//! 5. Run the simulation loop, collecting output rows
//! 6. Write the output table and log the result

mod error;
mod landscape;

use std::path::{Path, PathBuf};

use inseeds_core::component::FarmingComponent;
use inseeds_core::config::SimulationConfig;
use inseeds_core::context::SimulationContext;
use inseeds_core::factory::{DefaultFarmerFactory, default_decision_maker, default_lobby_group};
use inseeds_core::runner::{self, OutputCollector};
use inseeds_core::tick;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::landscape::{LandscapeConfig, YieldNoise};

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "inseeds-config.yaml";

/// Environment variable overriding the configuration file path.
const CONFIG_ENV: &str = "INSEEDS_CONFIG";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is configured from it.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config = %config_path.display(),
        world_name = config.world.name,
        seed = config.world.seed,
        max_ticks = config.simulation.max_ticks,
        "inseeds-engine starting"
    );

    // 3. Generate the landscape.
    let landscape = load_landscape_config(&config_path)?;
    let world = landscape::generate_world(&landscape, &config.world)?;

    // 4. Create agents.
    let mut ctx = SimulationContext::new(world);
    let component = FarmingComponent::new(config.coupled_config.clone());
    let factory = DefaultFarmerFactory::from_config(&config);
    component.init_farmers(&mut ctx, |id, cell| factory.build(id, cell))?;
    component.init_decision_makers(&mut ctx, default_decision_maker)?;
    component.init_lobby_groups(&mut ctx, default_lobby_group)?;
    for (kind, count) in tick::agent_counts(&ctx) {
        info!(kind = kind.as_str(), count, "Agents ready");
    }

    // 5. Run the simulation.
    let mut collector = OutputCollector::new(config.output.clone());
    collector.record(&ctx, 0)?;
    let mut cells = YieldNoise::new(config.world.seed, landscape.yield_noise);
    let result = runner::run_simulation(
        &mut ctx,
        &component,
        &mut cells,
        config.simulation.max_ticks,
        &mut collector,
    )?;
    runner::log_simulation_end(&result);

    // 6. Write output rows.
    let table = collector.into_table();
    match (&config.output.path, config.output.enabled) {
        (Some(path), true) => {
            write_output(Path::new(path), &table.to_json_lines()?)?;
            info!(path = path.as_str(), rows = table.len(), "Output table written");
        }
        (None, true) => info!(rows = table.len(), "No output path configured, rows discarded"),
        (_, false) => info!("Output disabled"),
    }

    info!(total_ticks = result.total_ticks, "inseeds-engine shutdown complete");
    Ok(())
}

/// Path of the configuration file: `$INSEEDS_CONFIG` if set, otherwise
/// `inseeds-config.yaml` in the working directory.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
}

/// Load the main simulation configuration.
///
/// Falls back to defaults when the file does not exist.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Load the landscape configuration.
///
/// Reads the `landscape` section from the YAML config file. If the file
/// does not exist or lacks the `landscape` key, defaults are used.
fn load_landscape_config(path: &Path) -> Result<LandscapeConfig, EngineError> {
    if !path.exists() {
        return Ok(LandscapeConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;

    // Parse the full YAML and extract just the "landscape" section.
    let raw: serde_yml::Value =
        serde_yml::from_str(&contents).map_err(|e| EngineError::Landscape {
            message: format!("failed to parse config YAML: {e}"),
        })?;

    raw.get("landscape").map_or_else(
        || Ok(LandscapeConfig::default()),
        |section| {
            serde_yml::from_value(section.clone()).map_err(|e| EngineError::Landscape {
                message: format!("failed to parse landscape config: {e}"),
            })
        },
    )
}

/// Write `contents` to `path`, creating parent directories as needed.
fn write_output(path: &Path, contents: &str) -> Result<(), EngineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
