//! Headless engine binary for the Primordia simulation.
//!
//! Loads configuration, builds the world, and runs the scheduler loop until
//! the tick limit is reached or the operator stops it.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `primordia-config.yaml` (or the path in
//!    `PRIMORDIA_CONFIG`), falling back to defaults
//! 2. Initialize structured logging (tracing)
//! 3. Build and populate the world
//! 4. Create operator state and start the stdin control reader
//! 5. Run the simulation loop
//! 6. Log the result

mod controls;
mod error;
mod narrative;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use primordia_core::config::{LoggingConfig, SimulationConfig};
use primordia_core::operator::OperatorState;
use primordia_core::runner;
use primordia_core::tick::SimulationState;

use crate::error::EngineError;
use crate::narrative::NarrativeCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "primordia-config.yaml";

/// Environment variable overriding the configuration path.
const CONFIG_PATH_ENV: &str = "PRIMORDIA_CONFIG";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, world setup, or the simulation
/// itself fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = SimulationConfig::load_or_default(&config_path)?;
    config.validate()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        path = %config_path.display(),
        world_name = %config.world.name,
        seed = config.world.seed,
        spatial_index = ?config.world.spatial_index,
        "Configuration loaded"
    );

    // 3. Build the world.
    let mut state = SimulationState::new(config)?;
    info!(
        entities = state.world.len(),
        population = state.stats.population,
        technologies = state.ledger.technologies().len(),
        "World initialized"
    );

    // 4. Operator controls.
    let operator = Arc::new(OperatorState::new(&state.config.scheduler));
    let _stdin = controls::spawn_stdin_reader(Arc::clone(&operator));
    let _interrupt = controls::spawn_interrupt_handler(Arc::clone(&operator));
    info!(
        speed = operator.speed(),
        tick_interval_ms = operator.tick_interval_ms(),
        max_ticks = operator.max_ticks(),
        paused = operator.is_paused(),
        "Operator controls ready (return: pause/resume, r: reset, 1/2/3: speed, q: quit)"
    );

    let mut callback = NarrativeCallback::new(
        Arc::clone(&operator),
        state.config.logging.snapshot_interval_ticks,
    );

    // 5. Run the simulation.
    let result = runner::run_simulation(&mut state, &operator, &mut callback).await?;

    // 6. Log results.
    runner::log_simulation_end(&result, &state);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "primordia-engine shutdown complete"
    );

    Ok(())
}

/// The configuration path: `PRIMORDIA_CONFIG` if set, else the default.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(config: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
