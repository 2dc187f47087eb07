//! Core entity structs for the Primordia simulation.
//!
//! Entities are a proper sum type: each variant carries exactly the fields
//! its kind needs, so a [`Human`] always has hit points, age, knowledge,
//! and personality by construction.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionKind, BuildingKind, EntityKind, KnowledgeCategory};
use crate::ids::EntityId;
use crate::knowledge::Knowledge;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in the 2D world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this position by a velocity for one tick.
    #[must_use]
    pub fn advanced(self, velocity: Velocity) -> Self {
        Self::new(self.x + velocity.vx, self.y + velocity.vy)
    }

    /// Euclidean distance to another position.
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Per-tick displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Velocity {
    /// Horizontal component.
    pub vx: f64,
    /// Vertical component.
    pub vy: f64,
}

impl Velocity {
    /// A body at rest.
    pub const ZERO: Self = Self { vx: 0.0, vy: 0.0 };

    /// Create a velocity.
    pub const fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    /// Velocity pointing from `from` to `to`, scaled by `gain`.
    pub fn toward(from: Position, to: Position, gain: f64) -> Self {
        Self::new((to.x - from.x) * gain, (to.y - from.y) * gain)
    }

    /// Exponential decay toward rest.
    #[must_use]
    pub fn damped(self, factor: f64) -> Self {
        Self::new(self.vx * factor, self.vy * factor)
    }
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

/// Fixed behavioural traits, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Personality {
    /// Tendency toward conflict.
    pub aggression: f64,
    /// Drive to learn and wander.
    pub curiosity: f64,
    /// Desire for company.
    pub social: f64,
}

impl Personality {
    /// Create a personality with every trait clamped to `[0, 1]`.
    pub fn new(aggression: f64, curiosity: f64, social: f64) -> Self {
        Self {
            aggression: aggression.clamp(0.0, 1.0),
            curiosity: curiosity.clamp(0.0, 1.0),
            social: social.clamp(0.0, 1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity variants
// ---------------------------------------------------------------------------

/// An autonomous agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Human {
    /// Stable identifier.
    pub id: EntityId,
    /// Location in the world.
    pub position: Position,
    /// Visual radius (rendering only).
    pub size: f64,
    /// Visual color (rendering only).
    pub color: String,
    /// Hit points, 100 at spawn.
    pub hp: f64,
    /// Age in years.
    pub age: f64,
    /// Current displacement per tick.
    pub velocity: Velocity,
    /// Gathered resource stock.
    pub resources: f64,
    /// Number of children this human has had.
    pub children: u32,
    /// Accumulated knowledge.
    pub knowledge: Knowledge,
    /// The last decision, for display.
    pub goal: ActionKind,
    /// Fixed traits.
    pub personality: Personality,
    /// Episodic memory. Carried for display; no behaviour reads it.
    pub memory: Vec<String>,
}

impl Human {
    /// Knowledge in one category.
    pub const fn skill(&self, category: KnowledgeCategory) -> f64 {
        self.knowledge.get(category)
    }
}

/// A hostile or neutral creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mob {
    /// Stable identifier.
    pub id: EntityId,
    /// Location in the world.
    pub position: Position,
    /// Visual radius (rendering only).
    pub size: f64,
    /// Visual color (rendering only).
    pub color: String,
    /// Hit points. The mob dies at zero or below.
    pub hp: f64,
    /// Current displacement per tick.
    pub velocity: Velocity,
    /// Aggression drives attack versus flight; the rest is unused by behaviour.
    pub personality: Personality,
    /// Whether this is the "smart" variant (slower, calmer, more curious).
    pub smart: bool,
}

/// A passive resource source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tree {
    /// Stable identifier.
    pub id: EntityId,
    /// Location in the world.
    pub position: Position,
    /// Visual radius (rendering only).
    pub size: f64,
    /// Visual color (rendering only).
    pub color: String,
}

/// A permanent structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Building {
    /// Stable identifier.
    pub id: EntityId,
    /// Location in the world.
    pub position: Position,
    /// Visual radius (rendering only).
    pub size: f64,
    /// Visual color (rendering only).
    pub color: String,
    /// House or workshop.
    pub kind: BuildingKind,
}

/// Any entity in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Entity {
    /// An autonomous agent.
    Human(Human),
    /// A creature.
    Mob(Mob),
    /// A resource source.
    Tree(Tree),
    /// A structure.
    Building(Building),
}

impl Entity {
    /// Identifier of the wrapped entity.
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Human(h) => h.id,
            Self::Mob(m) => m.id,
            Self::Tree(t) => t.id,
            Self::Building(b) => b.id,
        }
    }

    /// Location of the wrapped entity.
    pub const fn position(&self) -> Position {
        match self {
            Self::Human(h) => h.position,
            Self::Mob(m) => m.position,
            Self::Tree(t) => t.position,
            Self::Building(b) => b.position,
        }
    }

    /// Kind discriminant.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Human(_) => EntityKind::Human,
            Self::Mob(_) => EntityKind::Mob,
            Self::Tree(_) => EntityKind::Tree,
            Self::Building(_) => EntityKind::Building,
        }
    }

    /// The human, if this entity is one.
    pub const fn as_human(&self) -> Option<&Human> {
        match self {
            Self::Human(h) => Some(h),
            _ => None,
        }
    }

    /// Mutable access to the human, if this entity is one.
    pub const fn as_human_mut(&mut self) -> Option<&mut Human> {
        match self {
            Self::Human(h) => Some(h),
            _ => None,
        }
    }

    /// The mob, if this entity is one.
    pub const fn as_mob(&self) -> Option<&Mob> {
        match self {
            Self::Mob(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable access to the mob, if this entity is one.
    pub const fn as_mob_mut(&mut self) -> Option<&mut Mob> {
        match self {
            Self::Mob(m) => Some(m),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Technology
// ---------------------------------------------------------------------------

/// A civilization-wide technology unlocked by aggregate knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Technology {
    /// Display name.
    pub name: String,
    /// Knowledge category whose population-wide sum is compared.
    pub category: KnowledgeCategory,
    /// Summed knowledge needed for discovery.
    pub required_knowledge: f64,
    /// Reserved; no logic reads it.
    #[serde(default)]
    pub cost: f64,
    /// Flips false to true once and never back.
    #[serde(default)]
    pub discovered: bool,
}

impl Technology {
    /// Create an undiscovered technology.
    pub fn new(name: &str, category: KnowledgeCategory, required_knowledge: f64, cost: f64) -> Self {
        Self {
            name: name.to_owned(),
            category,
            required_knowledge,
            cost,
            discovered: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Aggregate statistics derived from the world each tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stats {
    /// Living humans.
    pub population: u32,
    /// Cumulative human deaths.
    pub total_deaths: u64,
    /// Cumulative buildings raised.
    pub total_buildings: u64,
    /// Elapsed ticks.
    pub time: u64,
    /// Count of discovered technologies.
    pub technologies: u32,
    /// Mean knowledge across living humans.
    pub avg_knowledge: Knowledge,
    /// `floor((science + crafting + social) / 3)` over the mean knowledge.
    pub civilization_level: u32,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn personality_is_clamped() {
        let p = Personality::new(-0.2, 1.4, 0.5);
        assert_eq!(p.aggression, 0.0);
        assert_eq!(p.curiosity, 1.0);
        assert_eq!(p.social, 0.5);
    }

    #[test]
    fn velocity_toward_points_at_target() {
        let v = Velocity::toward(Position::new(0.0, 0.0), Position::new(10.0, -5.0), 0.1);
        assert!(v.vx > 0.0);
        assert!(v.vy < 0.0);
    }

    #[test]
    fn damping_decays_velocity() {
        let v = Velocity::new(1.0, -2.0).damped(0.5);
        assert_eq!(v, Velocity::new(0.5, -1.0));
    }

    #[test]
    fn entity_tagged_serialization() {
        let tree = Entity::Tree(Tree {
            id: EntityId::new(),
            position: Position::new(1.0, 2.0),
            size: 5.0,
            color: String::from("#8FBC8F"),
        });
        let json = serde_json::to_value(&tree).unwrap_or_default();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("tree"));
        assert_eq!(tree.kind(), EntityKind::Tree);
        assert!(tree.as_human().is_none());
    }
}
