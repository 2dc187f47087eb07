//! Read-only snapshot handed to rendering and UI collaborators.
//!
//! A snapshot owns clones of everything it carries, so a renderer can hold
//! it while the engine steps again without tearing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::events::NarrativeEvent;
use crate::structs::{Entity, Stats, Technology};

/// Everything an external renderer or stats panel needs for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Tick at which the snapshot was taken.
    pub tick: u64,
    /// All live entities in id order.
    pub entities: Vec<Entity>,
    /// Aggregate statistics.
    pub stats: Stats,
    /// Technology ledger state.
    pub technologies: Vec<Technology>,
    /// Recent events, newest first.
    pub events: Vec<NarrativeEvent>,
}
