//! Narrative events emitted by the engine for the UI event log.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BuildingKind, KnowledgeCategory};
use crate::ids::EntityId;

/// Ticks per simulated year, used to stamp events.
pub const TICKS_PER_YEAR: u64 = 10;

/// What happened, with the data the UI needs to describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// A fresh world was generated.
    WorldCreated,
    /// Two humans exchanged knowledge in a category.
    KnowledgeShared {
        /// Category that moved.
        category: KnowledgeCategory,
    },
    /// A child was born.
    Birth {
        /// The newborn.
        child: EntityId,
    },
    /// A building was raised.
    BuildingConstructed {
        /// The builder.
        builder: EntityId,
        /// House or workshop.
        building: BuildingKind,
    },
    /// A human killed a mob.
    MobDefeated {
        /// The victor.
        human: EntityId,
    },
    /// An aggressive mob struck a human.
    MobAttack {
        /// The victim.
        human: EntityId,
    },
    /// A solitary learner had a breakthrough.
    Breakthrough {
        /// The learner.
        human: EntityId,
        /// Category that jumped.
        category: KnowledgeCategory,
    },
    /// A human died.
    Death {
        /// The deceased.
        human: EntityId,
        /// Age at death in whole years.
        age: u32,
        /// Whether the deceased counted as a sage.
        sage: bool,
    },
    /// The population floor spawned a newcomer.
    EmergencySpawn {
        /// The newcomer.
        human: EntityId,
    },
    /// A technology was discovered.
    TechnologyDiscovered {
        /// Technology name.
        name: String,
    },
}

/// A stamped entry in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NarrativeEvent {
    /// Tick on which the event happened.
    pub tick: u64,
    /// Simulated year (`tick / 10`).
    pub year: u64,
    /// Structured payload.
    pub kind: EventKind,
    /// Human-readable line for the log.
    pub message: String,
}

impl NarrativeEvent {
    /// Stamp an event, deriving its year and default message.
    pub fn new(tick: u64, kind: EventKind) -> Self {
        let message = describe(&kind);
        Self {
            tick,
            year: tick.checked_div(TICKS_PER_YEAR).unwrap_or(0),
            kind,
            message,
        }
    }

    /// The log line as the UI prints it: `[<year>y] <message>`.
    pub fn log_line(&self) -> String {
        format!("[{}y] {}", self.year, self.message)
    }
}

fn describe(kind: &EventKind) -> String {
    match kind {
        EventKind::WorldCreated => {
            String::from("A new world was created. The great simulation of human evolution begins.")
        }
        EventKind::KnowledgeShared { category } => {
            format!("People shared knowledge of {category}")
        }
        EventKind::Birth { .. } => {
            String::from("A new human was born, inheriting the knowledge of their parents")
        }
        EventKind::BuildingConstructed { building, .. } => format!("A {building} was built"),
        EventKind::MobDefeated { .. } => {
            String::from("A human defeated a mob and claimed its resources")
        }
        EventKind::MobAttack { .. } => String::from("An aggressive mob attacks a human"),
        EventKind::Breakthrough { category, .. } => {
            format!("A breakthrough in {category}")
        }
        EventKind::Death { age, sage: true, .. } => {
            format!("A sage died at the age of {age}, leaving great knowledge to those nearby")
        }
        EventKind::Death { age, sage: false, .. } => {
            format!("A human died at the age of {age}, leaving knowledge to descendants")
        }
        EventKind::EmergencySpawn { .. } => {
            String::from("A wanderer arrived to join the dwindling population")
        }
        EventKind::TechnologyDiscovered { name } => format!("Technology discovered: {name}!"),
    }
}
