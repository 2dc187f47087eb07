//! Enumeration types for the Primordia simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// Discriminant of the [`Entity`](crate::Entity) sum type, used as the type
/// filter for spatial queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// An autonomous agent with knowledge and personality.
    Human,
    /// A hostile or neutral creature.
    Mob,
    /// A passive resource source.
    Tree,
    /// A permanent structure raised by the build action.
    Building,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Mob => write!(f, "mob"),
            Self::Tree => write!(f, "tree"),
            Self::Building => write!(f, "building"),
        }
    }
}

// ---------------------------------------------------------------------------
// Knowledge categories
// ---------------------------------------------------------------------------

/// One of the five axes of the knowledge vector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum KnowledgeCategory {
    /// Abstract understanding of the world.
    Science,
    /// Tool making and construction.
    Crafting,
    /// Fighting skill.
    Combat,
    /// Foraging and staying alive.
    Survival,
    /// Cooperation and communication.
    Social,
}

impl KnowledgeCategory {
    /// All categories in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Science,
        Self::Crafting,
        Self::Combat,
        Self::Survival,
        Self::Social,
    ];

    /// Lowercase name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Science => "science",
            Self::Crafting => "crafting",
            Self::Combat => "combat",
            Self::Survival => "survival",
            Self::Social => "social",
        }
    }
}

impl core::fmt::Display for KnowledgeCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The action a human chose for the current tick.
///
/// Also stored on the human as its current goal for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Exchange knowledge with a neighbor, possibly reproduce.
    Socialize,
    /// Collect resources from a nearby tree.
    Gather,
    /// Spend resources to raise a building.
    Build,
    /// Attack a nearby mob.
    Fight,
    /// Study alone.
    Learn,
    /// Wander.
    #[default]
    Explore,
}

impl ActionKind {
    /// All action kinds in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Socialize,
        Self::Gather,
        Self::Build,
        Self::Fight,
        Self::Learn,
        Self::Explore,
    ];
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Socialize => write!(f, "socialize"),
            Self::Gather => write!(f, "gather"),
            Self::Build => write!(f, "build"),
            Self::Fight => write!(f, "fight"),
            Self::Learn => write!(f, "learn"),
            Self::Explore => write!(f, "explore"),
        }
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// Type tag of a [`Building`](crate::Building).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BuildingKind {
    /// A dwelling.
    House,
    /// A place of craft.
    Workshop,
}

impl core::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::House => write!(f, "house"),
            Self::Workshop => write!(f, "workshop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_category_serializes_snake_case() {
        let json = serde_json::to_string(&KnowledgeCategory::Survival).unwrap_or_default();
        assert_eq!(json, "\"survival\"");
    }

    #[test]
    fn default_action_is_explore() {
        assert_eq!(ActionKind::default(), ActionKind::Explore);
    }

    #[test]
    fn category_names_are_distinct() {
        let names: std::collections::BTreeSet<&str> =
            KnowledgeCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), KnowledgeCategory::ALL.len());
    }
}
