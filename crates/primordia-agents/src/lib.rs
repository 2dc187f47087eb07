//! Agent behaviour and lifecycle for the Primordia simulation.
//!
//! Everything here operates on a borrowed [`WorldState`] without I/O.
//! Planners return [`TickCommand`]s; the tick step in `primordia-core`
//! decides when they are committed.
//!
//! # Modules
//!
//! - [`actions`] -- Executors for the six human actions
//! - [`command`] -- [`TickCommand`] and the commit step
//! - [`config`] -- Behaviour, mob, reproduction, and lifecycle parameters
//! - [`decision`] -- Priority-scored action choice
//! - [`error`] -- [`AgentError`]
//! - [`exchange`] -- Pairwise knowledge convergence
//! - [`lifecycle`] -- Aging, death, bequest, emergency repopulation
//! - [`mob`] -- Chase, strike, flee, and wander
//! - [`reproduction`] -- Population-pressure births
//!
//! [`WorldState`]: primordia_world::WorldState

pub mod actions;
pub mod command;
pub mod config;
pub mod decision;
pub mod error;
pub mod exchange;
pub mod lifecycle;
pub mod mob;
pub mod reproduction;

pub use actions::{ActionContext, plan_human};
pub use command::{TickCommand, commit, integrate_motion};
pub use config::{BehaviorConfig, LifecycleConfig, MobConfig, ReproductionConfig};
pub use decision::{Proposal, decide, proposals};
pub use error::AgentError;
pub use exchange::{Exchange, converge, exchange};
pub use lifecycle::{DeathRecord, LifecycleReport, run_lifecycle};
pub use mob::plan_mob;
pub use reproduction::{birth_probability, create_child, try_conceive};
