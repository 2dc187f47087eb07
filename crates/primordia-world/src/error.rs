//! Error types for the `primordia-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use primordia_types::{EntityId, EntityKind};

/// Errors that can occur during world-state operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No live entity has this identifier.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity exists but is of a different kind than requested.
    #[error("entity {id} is a {found}, expected a {expected}")]
    WrongKind {
        /// The entity looked up.
        id: EntityId,
        /// The kind the caller needed.
        expected: EntityKind,
        /// The kind actually stored.
        found: EntityKind,
    },

    /// An entity with this identifier is already in the world.
    #[error("duplicate entity id: {0}")]
    DuplicateId(EntityId),

    /// A spatial index was configured with unusable parameters.
    #[error("invalid spatial configuration: {0}")]
    InvalidSpatialConfig(&'static str),
}
