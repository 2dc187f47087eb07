//! World state, spatial queries, generation, and the technology ledger for
//! the Primordia simulation.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world operations
//! - [`generation`] -- Initial population and randomized spawns
//! - [`ledger`] -- [`TechnologyLedger`] evaluation and discovery boosts
//! - [`roll`] -- Probability helpers over an injected random source
//! - [`spatial`] -- Box proximity queries behind the [`SpatialQuery`] trait
//! - [`state`] -- [`WorldState`], the entity arena

pub mod error;
pub mod generation;
pub mod ledger;
pub mod roll;
pub mod spatial;
pub mod state;

pub use error::WorldError;
pub use generation::{
    PersonalityRanges, UniformRange, WorldGenConfig, human_at, populate, random_human,
};
pub use ledger::{TechnologyConfig, TechnologyLedger, default_technologies};
pub use spatial::{Extent, FullScan, GridIndex, Neighborhood, PerceptionConfig, SpatialQuery};
pub use state::WorldState;
