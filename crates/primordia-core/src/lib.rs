//! World clock, configuration, tick step, and scheduler for the Primordia
//! simulation.
//!
//! # Modules
//!
//! - [`clock`] -- Logical tick counter with derived years.
//! - [`config`] -- Configuration loading from `primordia-config.yaml` into
//!   strongly-typed structs.
//! - [`events`] -- Bounded, newest-first [`EventLog`].
//! - [`operator`] -- Shared pause/speed/reset/stop controls.
//! - [`runner`] -- The async scheduler loop around [`run_tick`].
//! - [`tick`] -- The tick step and [`SimulationState`].
//!
//! [`EventLog`]: events::EventLog
//! [`run_tick`]: tick::run_tick
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod events;
pub mod operator;
pub mod runner;
pub mod tick;
