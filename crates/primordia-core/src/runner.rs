//! Simulation loop runner with operator controls.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Pause/resume**: operator can halt and continue the tick loop
//! - **Variable speed**: tick interval follows the speed multiplier
//! - **Reset**: the world is rebuilt between ticks on request
//! - **Operator stop**: immediate clean stop
//!
//! Extinction does not end a run. The loop keeps stepping an empty world
//! so emergency repopulation can revive it.
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed, across resets.
    pub total_ticks: u64,
    /// Number of resets performed.
    pub resets: u32,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to log narrative events, publish
/// snapshots, and so on. The callback receives the tick summary and the
/// current simulation state.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);

    /// Called after the world has been reset.
    fn on_reset(&mut self, _state: &SimulationState) {}
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Arguments
///
/// * `state` - Mutable simulation state (world, ledger, clock)
/// * `operator` - Shared operator control state
/// * `callback` - Called after each tick
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution or reset fails.
pub async fn run_simulation(
    state: &mut SimulationState,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut resets: u32 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        speed = operator.speed(),
        tick_interval_ms = operator.tick_interval_ms(),
        population = state.stats.population,
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!(tick = state.clock.tick(), "Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            let reason = SimulationEndReason::OperatorStop;
            operator.set_end_reason(reason.clone()).await;
            return Ok(SimulationResult {
                end_reason: reason,
                final_summary: last_summary,
                total_ticks,
                resets,
            });
        }

        // --- Apply reset request ---
        if operator.take_reset_request() {
            state.reset()?;
            resets = resets.saturating_add(1);
            callback.on_reset(state);
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state)?;

        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        if summary.population == 0 && summary.spawned.is_none() {
            warn!(tick = summary.tick, "No humans alive; waiting for repopulation");
        }

        // --- Check tick limit (after tick) ---
        // run_tick advances the clock internally, so summary.tick is the
        // tick number that just ran.
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            let reason = SimulationEndReason::MaxTicksReached;
            operator.set_end_reason(reason.clone()).await;
            return Ok(SimulationResult {
                end_reason: reason,
                final_summary: Some(summary),
                total_ticks,
                resets,
            });
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult, state: &SimulationState) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        resets = result.resets,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_population = result.final_summary.as_ref().map(|s| s.population),
        "Simulation ended"
    );
    if result.final_summary.is_some() {
        info!(
            tick = state.stats.time,
            population = state.stats.population,
            total_deaths = state.stats.total_deaths,
            total_buildings = state.stats.total_buildings,
            technologies = state.stats.technologies,
            civilization_level = state.stats.civilization_level,
            "Final stats"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{SchedulerConfig, SimulationConfig};

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.generation.tree_count = 10;
        config.world.generation.human_count = 5;
        config.world.generation.mob_count = 5;
        config
    }

    fn operator(max_ticks: u64) -> Arc<OperatorState> {
        let operator = OperatorState::new(&SchedulerConfig {
            max_ticks,
            ..SchedulerConfig::default()
        });
        let _ = operator.set_speed(1000);
        Arc::new(operator)
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut state = SimulationState::new(small_config()).unwrap();
        let operator = operator(5);
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(
            operator.end_reason().await,
            Some(SimulationEndReason::MaxTicksReached)
        );
    }

    #[tokio::test]
    async fn operator_stop() {
        let mut state = SimulationState::new(small_config()).unwrap();
        let operator = operator(0);
        operator.request_stop();
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test]
    async fn extinction_does_not_end_the_run() {
        let mut config = small_config();
        config.world.generation.human_count = 0;
        config.lifecycle.emergency_probability = 0.0;
        let mut state = SimulationState::new(config).unwrap();
        let operator = operator(4);
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 4);
    }

    #[tokio::test]
    async fn reset_request_restarts_the_clock() {
        let mut state = SimulationState::new(small_config()).unwrap();
        for _ in 0..7 {
            tick::run_tick(&mut state).unwrap();
        }
        let operator = operator(3);
        operator.request_reset();
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.resets, 1);
        assert_eq!(result.total_ticks, 3);
        assert_eq!(state.clock.tick(), 3);
    }

    #[tokio::test]
    async fn tick_callback_is_called() {
        struct CountCallback {
            count: u64,
        }
        impl TickCallback for CountCallback {
            fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {
                self.count = self.count.saturating_add(1);
            }
        }

        let mut state = SimulationState::new(small_config()).unwrap();
        let operator = operator(3);
        let mut cb = CountCallback { count: 0 };

        let _ = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(cb.count, 3);
    }
}
