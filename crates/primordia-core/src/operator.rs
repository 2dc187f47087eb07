//! Operator control state for runtime simulation management.
//!
//! This module provides shared atomic state used by the tick loop and the
//! control reader. The operator can pause/resume, change speed, reset the
//! world, and trigger a clean shutdown without stopping the process.
//!
//! # Architecture
//!
//! All mutable control fields use [`std::sync::atomic`] types so the state
//! can sit in an [`Arc`](std::sync::Arc) shared between the tick loop task
//! and the control reader task without locks on the hot path.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SchedulerConfig;

/// Reason why the simulation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// A control command read from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Flip between running and paused.
    TogglePause,
    /// Pause.
    Pause,
    /// Resume.
    Resume,
    /// Reinitialize the world on the next loop iteration.
    Reset,
    /// Select a speed preset by 1-based number.
    Preset(usize),
    /// Set an explicit speed multiplier.
    Speed(u64),
    /// Stop the run.
    Stop,
}

/// Error returned when a control line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized control command: {input:?}")]
pub struct ParseControlError {
    /// The offending input, trimmed.
    pub input: String,
}

impl FromStr for ControlCommand {
    type Err = ParseControlError;

    /// Parse one control line.
    ///
    /// `space`/`p` toggles, `pause`/`resume` set the state, `r`/`reset`
    /// resets, `1`..`9` pick a preset, `speed N` sets a multiplier, and
    /// `q`/`quit`/`stop` stop the run. An empty line (a bare space or
    /// return) toggles.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim().to_ascii_lowercase();
        let err = || ParseControlError {
            input: trimmed.clone(),
        };
        let mut words = trimmed.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::TogglePause);
        };
        let command = match head {
            "p" | "toggle" => Self::TogglePause,
            "pause" => Self::Pause,
            "resume" | "play" => Self::Resume,
            "r" | "reset" => Self::Reset,
            "q" | "quit" | "stop" => Self::Stop,
            "speed" => {
                let value = words.next().ok_or_else(err)?;
                Self::Speed(value.parse().map_err(|_parse| err())?)
            }
            preset => match preset.parse::<usize>() {
                Ok(n) if (1..=9).contains(&n) => Self::Preset(n),
                _ => return Err(err()),
            },
        };
        if words.next().is_some() {
            return Err(err());
        }
        Ok(command)
    }
}

/// Shared operator control state.
///
/// This struct is wrapped in an `Arc` and shared between the tick loop and
/// the control reader. Atomic fields are used for lock-free reads on the
/// tick loop hot path.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the simulation is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the tick loop when resumed or stopped.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Whether a world reset has been requested.
    reset_requested: AtomicBool,

    /// Milliseconds per tick at speed 1.
    base_tick_ms: u64,

    /// Current speed multiplier (runtime-adjustable).
    speed: AtomicU64,

    /// Speeds selectable by preset number.
    presets: Vec<u64>,

    /// Wall-clock time when the simulation started.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Reason the simulation ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create a new operator state from configuration.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            paused: AtomicBool::new(config.start_paused),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            reset_requested: AtomicBool::new(false),
            base_tick_ms: config.base_tick_ms,
            speed: AtomicU64::new(config.speed.max(1)),
            presets: config.speed_presets.clone(),
            started_at: Utc::now(),
            max_ticks: config.max_ticks,
            end_reason: Mutex::new(None),
        }
    }

    /// Apply a parsed control command.
    ///
    /// Returns `false` if the command was rejected and nothing changed: an
    /// unknown preset or a zero speed.
    pub fn apply(&self, command: ControlCommand) -> bool {
        match command {
            ControlCommand::TogglePause => self.toggle_pause(),
            ControlCommand::Pause => self.pause(),
            ControlCommand::Resume => self.resume(),
            ControlCommand::Reset => self.request_reset(),
            ControlCommand::Preset(n) => return self.select_preset(n).is_some(),
            ControlCommand::Speed(speed) => return self.set_speed(speed).is_some(),
            ControlCommand::Stop => self.request_stop(),
        }
        true
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The tick loop will sleep until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Flip between paused and running.
    pub fn toggle_pause(&self) {
        let was_paused = self.paused.fetch_xor(true, Ordering::AcqRel);
        if was_paused {
            self.resume_notify.notify_one();
        }
    }

    /// Wait until the simulation is no longer paused or a stop arrives.
    ///
    /// Returns immediately if not paused.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop / Reset
    // -----------------------------------------------------------------------

    /// Request a clean simulation stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Request a world reset before the next tick.
    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }

    /// Consume a pending reset request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    /// Record the reason the simulation ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the simulation ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Speed
    // -----------------------------------------------------------------------

    /// Current speed multiplier.
    pub fn speed(&self) -> u64 {
        self.speed.load(Ordering::Acquire)
    }

    /// Set the speed multiplier. Must be at least 1.
    ///
    /// Returns the previous speed on success, or `None` if the value was
    /// rejected.
    pub fn set_speed(&self, speed: u64) -> Option<u64> {
        if speed == 0 {
            return None;
        }
        Some(self.speed.swap(speed, Ordering::AcqRel))
    }

    /// Switch to the 1-based preset `n`.
    ///
    /// Returns the previous speed, or `None` if there is no such preset.
    pub fn select_preset(&self, n: usize) -> Option<u64> {
        let speed = *self.presets.get(n.checked_sub(1)?)?;
        self.set_speed(speed)
    }

    /// Milliseconds between ticks at the current speed.
    pub fn tick_interval_ms(&self) -> u64 {
        self.base_tick_ms.checked_div(self.speed()).unwrap_or(self.base_tick_ms)
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed seconds since simulation start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Assemble a status report for logging.
    pub fn status(&self, tick: u64, population: u32) -> SimulationStatus {
        SimulationStatus {
            tick,
            paused: self.is_paused(),
            speed: self.speed(),
            tick_interval_ms: self.tick_interval_ms(),
            elapsed_seconds: self.elapsed_seconds(),
            max_ticks: self.max_ticks,
            population,
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

/// JSON-serializable status of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Current tick number.
    pub tick: u64,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Current speed multiplier.
    pub speed: u64,
    /// Current tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Elapsed wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Configured maximum ticks (0 = unlimited).
    pub max_ticks: u64,
    /// Living humans.
    pub population: u32,
    /// ISO 8601 timestamp of when the simulation started.
    pub started_at: String,
}
