//! Subscription port — state-change notifications for a set of entities.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use syncswitch_domain::entity_ref::EntityRef;
use syncswitch_domain::event::StateChange;

/// Delivers state-change notifications for requested entities.
pub trait StateEventSource {
    /// Subscribe to state changes for the given entities.
    ///
    /// Only changes published *after* the subscription is created are
    /// delivered.
    fn subscribe(&self, entities: &[EntityRef]) -> Subscription;
}

impl<T: StateEventSource + Send + Sync> StateEventSource for std::sync::Arc<T> {
    fn subscribe(&self, entities: &[EntityRef]) -> Subscription {
        (**self).subscribe(entities)
    }
}

/// Handle on an active subscription.
///
/// Events for entities outside the subscribed set are filtered out.
/// [`unsubscribe`](Self::unsubscribe) is idempotent and safe to call before
/// any event arrived; dropping the subscription has the same effect.
pub struct Subscription {
    stream: Option<BroadcastStream<StateChange>>,
    entities: HashSet<EntityRef>,
}

impl Subscription {
    /// Wrap a broadcast receiver, keeping only events for `entities`.
    #[must_use]
    pub fn new(
        receiver: broadcast::Receiver<StateChange>,
        entities: impl IntoIterator<Item = EntityRef>,
    ) -> Self {
        Self {
            stream: Some(BroadcastStream::new(receiver)),
            entities: entities.into_iter().collect(),
        }
    }

    /// Receive the next state change for one of the subscribed entities.
    ///
    /// Returns `None` once the source closes or after
    /// [`unsubscribe`](Self::unsubscribe). When the receiver lags behind the
    /// source, the gap is logged and skipped.
    pub async fn recv(&mut self) -> Option<StateChange> {
        let stream = self.stream.as_mut()?;
        while let Some(item) = stream.next().await {
            match item {
                Ok(change) if self.entities.contains(&change.entity) => return Some(change),
                Ok(_) => {}
                Err(BroadcastStreamRecvError::Lagged(missed)) => {
                    warn!(missed, "subscription lagged; state changes were dropped");
                }
            }
        }
        None
    }

    /// Stop receiving events. Safe to call repeatedly.
    pub fn unsubscribe(&mut self) {
        self.stream = None;
    }

    /// Whether the subscription still delivers events.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncswitch_domain::state::EntityState;

    fn entity(s: &str) -> EntityRef {
        s.parse().unwrap()
    }

    fn change(s: &str, new: EntityState) -> StateChange {
        StateChange::new(entity(s), Some(EntityState::Off), new)
    }

    #[tokio::test]
    async fn should_deliver_changes_for_subscribed_entities() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx, vec![entity("switch.tv")]);

        tx.send(change("switch.tv", EntityState::On)).unwrap();

        let received = sub.recv().await.unwrap();
        assert_eq!(received.entity, entity("switch.tv"));
    }

    #[tokio::test]
    async fn should_filter_out_unrelated_entities() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx, vec![entity("switch.tv")]);

        tx.send(change("switch.other", EntityState::On)).unwrap();
        tx.send(change("switch.tv", EntityState::On)).unwrap();

        let received = sub.recv().await.unwrap();
        assert_eq!(received.entity, entity("switch.tv"));
    }

    #[tokio::test]
    async fn should_return_none_after_source_closes() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx, vec![entity("switch.tv")]);

        drop(tx);

        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn should_return_none_after_unsubscribe() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx, vec![entity("switch.tv")]);

        tx.send(change("switch.tv", EntityState::On)).unwrap();
        sub.unsubscribe();

        assert!(sub.recv().await.is_none());
        assert!(!sub.is_active());
    }

    #[tokio::test]
    async fn should_unsubscribe_idempotently() {
        let (_tx, rx) = broadcast::channel::<StateChange>(8);
        let mut sub = Subscription::new(rx, vec![entity("switch.tv")]);

        sub.unsubscribe();
        sub.unsubscribe();

        assert!(!sub.is_active());
    }
}
