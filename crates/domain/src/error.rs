//! Error types shared across the workspace.
//!
//! Each concern gets its own typed enum; the [`SyncError`] umbrella converts
//! from them via `#[from]` so handlers can use `?` throughout.

use crate::entity_ref::EntityRef;
use crate::state::EntityState;

/// Rejected group configurations. Fatal to the group's instantiation,
/// detected before activation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupConfigError {
    #[error("a group needs at least one slave entity")]
    NoSlaves,
    #[error("master entity {0} cannot also be listed as a slave")]
    MasterInSlaves(EntityRef),
    #[error("slave entity {0} is listed more than once")]
    DuplicateSlave(EntityRef),
}

/// A host command could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no entity {0} is known to the host")]
    UnknownEntity(EntityRef),
    #[error("host rejected the command: {0}")]
    Rejected(String),
}

/// Publishing the group's externally-visible state failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("publishing group state failed: {0}")]
pub struct PublishError(pub String);

/// Failures surfaced by the group synchroniser's handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("invalid group configuration")]
    Config(#[from] GroupConfigError),
    #[error("master {entity} reported unsupported state '{state}'")]
    UnrecognizedState { entity: EntityRef, state: EntityState },
    #[error("command dispatch failed")]
    Command(#[from] CommandError),
}
