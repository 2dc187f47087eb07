//! Tick callback that narrates events and emits periodic stats snapshots.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use primordia_core::operator::{OperatorState, SimulationStatus};
use primordia_core::runner::TickCallback;
use primordia_core::tick::{SimulationState, TickSummary};
use primordia_types::{EventKind, NarrativeEvent, Stats};

/// A JSON stats snapshot line.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    /// Scheduler status.
    pub status: SimulationStatus,
    /// Aggregate statistics.
    pub stats: Stats,
    /// Names of the technologies discovered so far.
    pub discovered: Vec<String>,
}

impl StatsReport {
    /// Assemble a report from the live state.
    pub fn capture(operator: &OperatorState, state: &SimulationState) -> Self {
        Self {
            status: operator.status(state.clock.tick(), state.stats.population),
            stats: state.stats.clone(),
            discovered: state
                .ledger
                .technologies()
                .iter()
                .filter(|t| t.discovered)
                .map(|t| t.name.clone())
                .collect(),
        }
    }
}

/// Logs narrative events and, every `snapshot_interval` ticks, a JSON stats
/// report.
pub struct NarrativeCallback {
    operator: Arc<OperatorState>,
    snapshot_interval: u64,
}

impl NarrativeCallback {
    /// Create a callback. A `snapshot_interval` of 0 disables reports.
    pub const fn new(operator: Arc<OperatorState>, snapshot_interval: u64) -> Self {
        Self {
            operator,
            snapshot_interval,
        }
    }

    fn report_due(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.snapshot_interval), Some(0))
    }

    fn emit_report(&self, state: &SimulationState) {
        let report = StatsReport::capture(&self.operator, state);
        match serde_json::to_string(&report) {
            Ok(json) => info!(tick = report.status.tick, report = %json, "Stats snapshot"),
            Err(e) => warn!(error = %e, "Failed to serialize stats snapshot"),
        }
    }
}

fn narrate(event: &NarrativeEvent) {
    if matches!(event.kind, EventKind::KnowledgeShared { .. }) {
        debug!(tick = event.tick, year = event.year, "{}", event.log_line());
    } else {
        info!(tick = event.tick, year = event.year, "{}", event.log_line());
    }
}

impl TickCallback for NarrativeCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        for event in &summary.events {
            narrate(event);
        }
        if self.report_due(summary.tick) {
            self.emit_report(state);
        }
    }

    fn on_reset(&mut self, state: &SimulationState) {
        if let Some(event) = state.events.latest() {
            narrate(event);
        }
        self.emit_report(state);
    }
}
