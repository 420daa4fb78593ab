//! Publisher port — exposing the group's own state to the host.

use std::future::Future;

use syncswitch_domain::error::PublishError;
use syncswitch_domain::group::GroupSnapshot;

/// Notifies the host of the group's updated externally-visible state
/// (for display/registry purposes).
pub trait GroupStatePublisher {
    fn publish(&self, snapshot: GroupSnapshot)
    -> impl Future<Output = Result<(), PublishError>> + Send;
}

impl<T: GroupStatePublisher + Send + Sync> GroupStatePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        snapshot: GroupSnapshot,
    ) -> impl Future<Output = Result<(), PublishError>> + Send {
        (**self).publish(snapshot)
    }
}
