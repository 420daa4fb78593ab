//! # syncswitch-adapter-virtual
//!
//! Virtual/demo host environment for testing and demonstration purposes.
//!
//! The [`VirtualHub`] holds simulated entities in memory and implements all
//! four app ports. Commands flip entity states and fire real state-change
//! events through an in-process bus, so a synchroniser wired against the hub
//! sees the same feedback a live platform would produce — including the
//! echoes its own commands cause.
//!
//! ## Dependency rule
//!
//! Depends on `syncswitch-app` (port traits) and `syncswitch-domain` only.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use syncswitch_app::event_bus::InProcessStateBus;
use syncswitch_app::ports::{
    CommandSink, GroupStatePublisher, StateEventSource, StateReader, Subscription,
};
use syncswitch_domain::command::SwitchCommand;
use syncswitch_domain::entity_ref::EntityRef;
use syncswitch_domain::error::{CommandError, PublishError};
use syncswitch_domain::event::StateChange;
use syncswitch_domain::group::GroupSnapshot;
use syncswitch_domain::state::EntityState;

/// In-memory hub of simulated entities.
///
/// Every state mutation that actually changes an entity fires a
/// [`StateChange`] to subscribers. Commands and published snapshots are
/// recorded so tests can assert on them.
pub struct VirtualHub {
    entities: Mutex<HashMap<EntityRef, EntityState>>,
    commands: Mutex<Vec<(Vec<EntityRef>, SwitchCommand)>>,
    published: Mutex<Vec<GroupSnapshot>>,
    bus: InProcessStateBus,
}

impl Default for VirtualHub {
    fn default() -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
            commands: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            bus: InProcessStateBus::new(64),
        }
    }
}

impl VirtualHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity (or overwrite its state) without firing an event.
    pub fn insert(&self, entity: EntityRef, state: EntityState) {
        self.lock(&self.entities).insert(entity, state);
    }

    /// Simulate an external state change (e.g. a physical button press).
    ///
    /// The entity is created on first observation; in that case the fired
    /// event carries no old state, exactly like a platform's first
    /// observation after boot.
    pub fn flip(&self, entity: &EntityRef, new: EntityState) {
        let old = self
            .lock(&self.entities)
            .insert(entity.clone(), new.clone());
        debug!(%entity, ?old, %new, "virtual entity changed");
        self.bus
            .broadcast(StateChange::new(entity.clone(), old, new));
    }

    /// Every `set_state` call received, in order.
    #[must_use]
    pub fn command_log(&self) -> Vec<(Vec<EntityRef>, SwitchCommand)> {
        self.lock(&self.commands).clone()
    }

    /// Every group snapshot published, in order.
    #[must_use]
    pub fn published(&self) -> Vec<GroupSnapshot> {
        self.lock(&self.published).clone()
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateReader for VirtualHub {
    fn state_of(&self, entity: &EntityRef) -> Option<EntityState> {
        self.lock(&self.entities).get(entity).cloned()
    }
}

impl CommandSink for VirtualHub {
    async fn set_state(
        &self,
        entities: &[EntityRef],
        command: SwitchCommand,
    ) -> Result<(), CommandError> {
        self.lock(&self.commands)
            .push((entities.to_vec(), command));

        let changes = {
            let mut states = self.lock(&self.entities);
            for entity in entities {
                if !states.contains_key(entity) {
                    return Err(CommandError::UnknownEntity(entity.clone()));
                }
            }

            let target = command.target_state();
            let mut changes = Vec::new();
            for entity in entities {
                let old = states.insert(entity.clone(), target.clone());
                if old.as_ref() != Some(&target) {
                    changes.push(StateChange::new(entity.clone(), old, target.clone()));
                }
            }
            changes
        };

        for change in changes {
            debug!(entity = %change.entity, new = %change.new, "virtual entity commanded");
            self.bus.broadcast(change);
        }
        Ok(())
    }
}

impl StateEventSource for VirtualHub {
    fn subscribe(&self, entities: &[EntityRef]) -> Subscription {
        self.bus.subscribe(entities)
    }
}

impl GroupStatePublisher for VirtualHub {
    async fn publish(&self, snapshot: GroupSnapshot) -> Result<(), PublishError> {
        debug!(id = %snapshot.id, state = %snapshot.state, "group state published");
        self.lock(&self.published).push(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(s: &str) -> EntityRef {
        s.parse().unwrap()
    }

    #[test]
    fn should_report_state_of_inserted_entity() {
        let hub = VirtualHub::new();
        hub.insert(entity("switch.tv"), EntityState::Off);
        assert_eq!(hub.state_of(&entity("switch.tv")), Some(EntityState::Off));
    }

    #[test]
    fn should_report_none_for_unknown_entity() {
        let hub = VirtualHub::new();
        assert_eq!(hub.state_of(&entity("switch.tv")), None);
    }

    #[tokio::test]
    async fn should_fire_event_with_old_state_on_flip() {
        let hub = VirtualHub::new();
        hub.insert(entity("switch.tv"), EntityState::Off);
        let mut sub = hub.subscribe(&[entity("switch.tv")]);

        hub.flip(&entity("switch.tv"), EntityState::On);

        let change = sub.recv().await.unwrap();
        assert_eq!(change.old, Some(EntityState::Off));
        assert_eq!(change.new, EntityState::On);
    }

    #[tokio::test]
    async fn should_fire_bootstrap_event_on_first_observation() {
        let hub = VirtualHub::new();
        let mut sub = hub.subscribe(&[entity("switch.tv")]);

        hub.flip(&entity("switch.tv"), EntityState::On);

        let change = sub.recv().await.unwrap();
        assert!(change.is_bootstrap());
    }

    #[tokio::test]
    async fn should_apply_command_and_fire_events() {
        let hub = VirtualHub::new();
        hub.insert(entity("switch.tv"), EntityState::Off);
        let mut sub = hub.subscribe(&[entity("switch.tv")]);

        hub.set_state(&[entity("switch.tv")], SwitchCommand::TurnOn)
            .await
            .unwrap();

        assert_eq!(hub.state_of(&entity("switch.tv")), Some(EntityState::On));
        let change = sub.recv().await.unwrap();
        assert_eq!(change.new, EntityState::On);
    }

    #[tokio::test]
    async fn should_not_fire_event_when_entity_already_at_target() {
        let hub = VirtualHub::new();
        hub.insert(entity("switch.tv"), EntityState::On);
        let mut sub = hub.subscribe(&[entity("switch.tv")]);

        hub.set_state(&[entity("switch.tv")], SwitchCommand::TurnOn)
            .await
            .unwrap();
        hub.flip(&entity("switch.tv"), EntityState::Off);

        // The first delivered event is the flip; the no-op command queued nothing.
        let change = sub.recv().await.unwrap();
        assert_eq!(change.new, EntityState::Off);
        // The call is still recorded.
        assert_eq!(hub.command_log().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_command_for_unknown_entity() {
        let hub = VirtualHub::new();
        let err = hub
            .set_state(&[entity("switch.ghost")], SwitchCommand::TurnOn)
            .await
            .unwrap_err();
        assert_eq!(err, CommandError::UnknownEntity(entity("switch.ghost")));
    }

    #[tokio::test]
    async fn should_record_published_snapshots() {
        use syncswitch_domain::group::{Group, GroupConfig, GroupId};

        let hub = VirtualHub::new();
        let group = Group::new(GroupConfig {
            unique_id: Some(GroupId::from("demo")),
            name: "Demo".to_string(),
            master: entity("switch.master"),
            slaves: vec![entity("switch.tv")],
            capability: std::collections::BTreeMap::new(),
        })
        .unwrap();

        hub.publish(group.snapshot()).await.unwrap();

        let published = hub.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, GroupId::from("demo"));
    }
}
