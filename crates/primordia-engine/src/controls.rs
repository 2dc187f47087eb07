//! Operator controls read from standard input and the interrupt signal.
//!
//! One command per line: a bare return or `p` toggles pause, `r` resets
//! the world, `1`/`2`/`3` pick a speed preset, `speed N` sets a multiplier,
//! and `q` stops the run.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use primordia_core::operator::{ControlCommand, OperatorState};

/// Parse one control line and apply it to `operator`.
///
/// Returns the applied command, or `None` if the line was not understood or
/// the operator rejected it.
pub fn handle_line(operator: &OperatorState, line: &str) -> Option<ControlCommand> {
    match line.parse::<ControlCommand>() {
        Ok(command) if operator.apply(command) => {
            info!(
                ?command,
                paused = operator.is_paused(),
                speed = operator.speed(),
                tick_interval_ms = operator.tick_interval_ms(),
                "Control command applied"
            );
            Some(command)
        }
        Ok(command) => {
            warn!(?command, speed = operator.speed(), "Control command rejected");
            None
        }
        Err(e) => {
            warn!(error = %e, "Ignoring control input");
            None
        }
    }
}

/// Read control lines from stdin until it closes.
///
/// Closing stdin leaves the simulation running.
pub fn spawn_stdin_reader(operator: Arc<OperatorState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let _ = handle_line(&operator, &line);
                }
                Ok(None) => {
                    debug!("Control input closed");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read control input");
                    break;
                }
            }
        }
    })
}

/// Request a clean stop when the process is interrupted.
pub fn spawn_interrupt_handler(operator: Arc<OperatorState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping");
                operator.request_stop();
            }
            Err(e) => warn!(error = %e, "Failed to listen for interrupt"),
        }
    })
}
