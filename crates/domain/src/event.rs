//! State-change events — observations delivered by the host environment.

use serde::{Deserialize, Serialize};

use crate::entity_ref::EntityRef;
use crate::state::EntityState;
use crate::time::{Timestamp, now};

/// A single observed state transition for one entity.
///
/// `old` is absent for the first observation after a host restart; such
/// events carry no synchronisation meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub entity: EntityRef,
    pub old: Option<EntityState>,
    pub new: EntityState,
    pub occurred_at: Timestamp,
}

impl StateChange {
    /// Build an event stamped with the current time.
    #[must_use]
    pub fn new(entity: EntityRef, old: Option<EntityState>, new: EntityState) -> Self {
        Self {
            entity,
            old,
            new,
            occurred_at: now(),
        }
    }

    /// First observation since restart/boot; not a real transition.
    #[must_use]
    pub fn is_bootstrap(&self) -> bool {
        self.old.is_none()
    }

    /// Old and new state are identical; nothing actually changed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.old.as_ref() == Some(&self.new)
    }
}
