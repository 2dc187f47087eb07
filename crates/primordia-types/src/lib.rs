//! Shared type definitions for the Primordia simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Snapshot types flow to `TypeScript` via `ts-rs` for the
//! external renderer and stats panel.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for entity identifiers
//! - [`enums`] -- Entity kinds, knowledge categories, actions, building types
//! - [`knowledge`] -- The five-category [`Knowledge`] vector
//! - [`structs`] -- Entity variants, [`Technology`], [`Stats`]
//! - [`events`] -- Narrative events for the UI log
//! - [`snapshot`] -- Read-only [`WorldSnapshot`]

pub mod enums;
pub mod events;
pub mod ids;
pub mod knowledge;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, BuildingKind, EntityKind, KnowledgeCategory};
pub use events::{EventKind, NarrativeEvent, TICKS_PER_YEAR};
pub use ids::EntityId;
pub use knowledge::Knowledge;
pub use snapshot::WorldSnapshot;
pub use structs::{
    Building, Entity, Human, Mob, Personality, Position, Stats, Technology, Tree, Velocity,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the renderer/UI snapshot types.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::EntityId::export_all();

        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::KnowledgeCategory::export_all();
        let _ = crate::enums::ActionKind::export_all();
        let _ = crate::enums::BuildingKind::export_all();

        let _ = crate::knowledge::Knowledge::export_all();
        let _ = crate::structs::Position::export_all();
        let _ = crate::structs::Velocity::export_all();
        let _ = crate::structs::Personality::export_all();
        let _ = crate::structs::Human::export_all();
        let _ = crate::structs::Mob::export_all();
        let _ = crate::structs::Tree::export_all();
        let _ = crate::structs::Building::export_all();
        let _ = crate::structs::Entity::export_all();
        let _ = crate::structs::Technology::export_all();
        let _ = crate::structs::Stats::export_all();

        let _ = crate::events::EventKind::export_all();
        let _ = crate::events::NarrativeEvent::export_all();
        let _ = crate::snapshot::WorldSnapshot::export_all();
    }
}
