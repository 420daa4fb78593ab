//! In-process state-change bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use syncswitch_domain::entity_ref::EntityRef;
use syncswitch_domain::event::StateChange;

use crate::ports::{StateEventSource, Subscription};

/// In-process state-change bus using a tokio [`broadcast`] channel.
///
/// Broadcasting succeeds even when there are no active subscribers
/// (the change is simply dropped).
pub struct InProcessStateBus {
    sender: broadcast::Sender<StateChange>,
}

impl InProcessStateBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast a state change to all current subscribers.
    pub fn broadcast(&self, change: StateChange) {
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let _ = self.sender.send(change);
    }
}

impl StateEventSource for InProcessStateBus {
    fn subscribe(&self, entities: &[EntityRef]) -> Subscription {
        Subscription::new(self.sender.subscribe(), entities.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncswitch_domain::state::EntityState;

    fn entity(s: &str) -> EntityRef {
        s.parse().unwrap()
    }

    fn change(s: &str) -> StateChange {
        StateChange::new(entity(s), Some(EntityState::Off), EntityState::On)
    }

    #[tokio::test]
    async fn should_deliver_change_to_subscriber() {
        let bus = InProcessStateBus::new(16);
        let mut sub = bus.subscribe(&[entity("switch.tv")]);

        bus.broadcast(change("switch.tv"));

        let received = sub.recv().await.unwrap();
        assert_eq!(received.entity, entity("switch.tv"));
        assert_eq!(received.new, EntityState::On);
    }

    #[tokio::test]
    async fn should_deliver_change_to_multiple_subscribers() {
        let bus = InProcessStateBus::new(16);
        let mut sub1 = bus.subscribe(&[entity("switch.tv")]);
        let mut sub2 = bus.subscribe(&[entity("switch.tv")]);

        bus.broadcast(change("switch.tv"));

        assert!(sub1.recv().await.is_some());
        assert!(sub2.recv().await.is_some());
    }

    #[test]
    fn should_succeed_when_no_subscribers() {
        let bus = InProcessStateBus::new(16);
        bus.broadcast(change("switch.tv"));
    }

    #[tokio::test]
    async fn should_not_deliver_changes_broadcast_before_subscription() {
        let bus = InProcessStateBus::new(16);

        bus.broadcast(change("switch.tv"));

        let mut sub = bus.subscribe(&[entity("switch.tv"), entity("light.hall")]);
        bus.broadcast(change("light.hall"));

        let received = sub.recv().await.unwrap();
        assert_eq!(received.entity, entity("light.hall"));
    }
}
