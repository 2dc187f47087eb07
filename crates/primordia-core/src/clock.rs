//! World clock for the Primordia simulation.
//!
//! The clock counts logical ticks and nothing else. The engine has no notion
//! of wall-clock time; cadence belongs to the scheduler. Years are derived
//! from the tick counter and never stored.

use primordia_types::TICKS_PER_YEAR;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Logical time of the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldClock {
    /// Ticks elapsed since the world was created.
    tick: u64,
}

impl WorldClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// A clock at an arbitrary tick (useful for testing).
    pub const fn from_tick(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated years elapsed (`tick / 10`).
    pub const fn year(&self) -> u64 {
        match self.tick.checked_div(TICKS_PER_YEAR) {
            Some(year) => year,
            None => 0,
        }
    }

    /// Return to tick 0.
    pub const fn reset(&mut self) {
        self.tick = 0;
    }
}
