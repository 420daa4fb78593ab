//! State lookup port — synchronous last-known-state reads.

use syncswitch_domain::entity_ref::EntityRef;
use syncswitch_domain::state::EntityState;

/// Synchronous lookup of an entity's last known state.
pub trait StateReader {
    /// The last state the host observed for `entity`, or `None` when the
    /// host has never seen it.
    fn state_of(&self, entity: &EntityRef) -> Option<EntityState>;
}

impl<T: StateReader + Send + Sync> StateReader for std::sync::Arc<T> {
    fn state_of(&self, entity: &EntityRef) -> Option<EntityState> {
        (**self).state_of(entity)
    }
}
