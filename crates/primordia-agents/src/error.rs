//! Error types for the `primordia-agents` crate.
//!
//! Planning never fails on well-formed state. These errors surface when an
//! id captured by a neighbor query no longer resolves, or when two records
//! cannot form a valid pair of parents.

use primordia_types::EntityId;
use primordia_world::WorldError;

/// Errors that can occur while planning or committing agent behaviour.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A world lookup failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A human cannot reproduce with itself.
    #[error("invalid parent pair: {0} cannot partner with itself")]
    InvalidParent(EntityId),
}
