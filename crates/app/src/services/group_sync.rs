//! Group synchroniser — keeps a master and its slaves in lock-step.
//!
//! The synchroniser reacts to state-change events for its members. Master
//! transitions move the group state and fan out to out-of-state slaves; slave
//! transitions are forwarded to the master only, so that every group-wide
//! update flows through the single master-changed path. Three guards keep the
//! reaction loop finite: bootstrap events (no old state) are ignored,
//! unchanged states are ignored, and events matching the current group state
//! are ignored.

use tracing::{debug, error, info, warn};

use syncswitch_domain::command::SwitchCommand;
use syncswitch_domain::entity_ref::EntityRef;
use syncswitch_domain::error::{GroupConfigError, SyncError};
use syncswitch_domain::event::StateChange;
use syncswitch_domain::group::{Group, GroupConfig};
use syncswitch_domain::state::{EntityState, GroupState};

use crate::ports::{CommandSink, GroupStatePublisher, StateEventSource, StateReader, Subscription};

/// Stateful reactive controller for one synchronised switch group.
///
/// Owns its group exclusively and processes one event at a time; all
/// outbound commands are awaited before the handler returns, so a reaction
/// completes (including publishing) before any event it caused can be
/// observed.
pub struct GroupSynchroniser<E, R, C, P> {
    group: Group,
    events: E,
    states: R,
    commands: C,
    publisher: P,
    subscription: Option<Subscription>,
}

impl<E, R, C, P> GroupSynchroniser<E, R, C, P>
where
    E: StateEventSource,
    R: StateReader,
    C: CommandSink,
    P: GroupStatePublisher,
{
    /// Validate the configuration and build the synchroniser.
    ///
    /// # Errors
    ///
    /// Returns [`GroupConfigError`] when the configuration violates group
    /// invariants (no slaves, master listed as slave, duplicate slaves).
    pub fn new(
        config: GroupConfig,
        events: E,
        states: R,
        commands: C,
        publisher: P,
    ) -> Result<Self, GroupConfigError> {
        let group = Group::new(config)?;
        info!(
            id = %group.id(),
            name = group.name(),
            master = %group.master(),
            slaves = group.slaves().len(),
            "creating synchronised switch group"
        );
        Ok(Self {
            group,
            events,
            states,
            commands,
            publisher,
            subscription: None,
        })
    }

    /// The group being synchronised.
    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Activate the group: subscribe to member state changes, seed the group
    /// state from the master's current reading, pull all slaves into
    /// agreement, and publish the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Command`] when the initial resync fails.
    pub async fn activate(&mut self) -> Result<(), SyncError> {
        let members: Vec<EntityRef> = self.group.members().cloned().collect();
        self.subscription = Some(self.events.subscribe(&members));

        match self.states.state_of(self.group.master()) {
            Some(EntityState::On) => self.group.transition(GroupState::On),
            Some(EntityState::Off) => self.group.transition(GroupState::Off),
            other => {
                warn!(
                    id = %self.group.id(),
                    master = %self.group.master(),
                    state = ?other,
                    "master state is unreadable; group starts unavailable"
                );
                self.group.transition(GroupState::Unknown);
            }
        }

        if let Some(command) = self.group.state().command() {
            self.resync_slaves(command).await?;
        }
        self.publish().await;
        Ok(())
    }

    /// Stop reacting to state changes. Idempotent; safe to call before
    /// activation or more than once.
    pub fn deactivate(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            debug!(id = %self.group.id(), "unsubscribing from member state changes");
            subscription.unsubscribe();
        }
    }

    /// Deliver subscribed events one at a time until the subscription
    /// closes. Handler failures are logged and not retried; the group
    /// catches up on the next real event.
    pub async fn run(&mut self) {
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                return;
            };
            let Some(change) = subscription.recv().await else {
                return;
            };
            if let Err(err) = self.handle_event(&change).await {
                error!(
                    id = %self.group.id(),
                    entity = %change.entity,
                    %err,
                    "state change handling failed"
                );
            }
        }
    }

    /// Dispatch one state-change event to the master or slave handler.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnrecognizedState`] when the master reports a
    /// state outside the binary model, or [`SyncError::Command`] when an
    /// outbound command fails.
    pub async fn handle_event(&mut self, change: &StateChange) -> Result<(), SyncError> {
        if self.group.is_master(&change.entity) {
            self.master_changed(change).await
        } else if self.group.is_slave(&change.entity) {
            self.slave_changed(change).await
        } else {
            debug!(entity = %change.entity, "ignoring state change outside the group");
            Ok(())
        }
    }

    /// Turn the whole group on.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Command`] when a host command fails.
    pub async fn turn_on(&mut self) -> Result<(), SyncError> {
        self.apply(SwitchCommand::TurnOn).await
    }

    /// Turn the whole group off.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Command`] when a host command fails.
    pub async fn turn_off(&mut self) -> Result<(), SyncError> {
        self.apply(SwitchCommand::TurnOff).await
    }

    /// Turn the group on unless it is currently on.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Command`] when a host command fails.
    pub async fn toggle(&mut self) -> Result<(), SyncError> {
        match self.group.state() {
            GroupState::On => self.turn_off().await,
            GroupState::Off | GroupState::Unknown => self.turn_on().await,
        }
    }

    async fn master_changed(&mut self, change: &StateChange) -> Result<(), SyncError> {
        if change.is_bootstrap() {
            debug!(master = %change.entity, "ignoring bootstrap state change");
            return Ok(());
        }
        if change.is_noop() {
            return Ok(());
        }

        let command = match &change.new {
            EntityState::On => SwitchCommand::TurnOn,
            EntityState::Off => SwitchCommand::TurnOff,
            EntityState::Unknown | EntityState::Unavailable => {
                warn!(
                    id = %self.group.id(),
                    master = %change.entity,
                    state = %change.new,
                    "master became unreadable; group degrades to unknown"
                );
                self.group.transition(GroupState::Unknown);
                self.publish().await;
                return Ok(());
            }
            EntityState::Other(_) => {
                return Err(SyncError::UnrecognizedState {
                    entity: change.entity.clone(),
                    state: change.new.clone(),
                });
            }
        };

        if command.group_state() == self.group.state() {
            debug!(
                master = %change.entity,
                state = %change.new,
                "group already in target state; skipping update"
            );
            return Ok(());
        }

        debug!(
            id = %self.group.id(),
            master = %change.entity,
            old = ?change.old,
            new = %change.new,
            "master changed; updating group state"
        );
        self.group.transition(command.group_state());
        self.resync_slaves(command).await?;
        self.publish().await;
        Ok(())
    }

    async fn slave_changed(&mut self, change: &StateChange) -> Result<(), SyncError> {
        if change.is_bootstrap() {
            debug!(slave = %change.entity, "ignoring bootstrap state change");
            return Ok(());
        }
        if change.is_noop() {
            return Ok(());
        }

        let Some(command) = SwitchCommand::from_state(&change.new) else {
            debug!(
                slave = %change.entity,
                state = %change.new,
                "slave state is unreadable; waiting for a real state"
            );
            return Ok(());
        };

        // A slave catching up with the group is an echo of our own command,
        // not a new intent. Skipping it is what terminates the
        // slave -> master -> slaves cycle.
        if command.group_state() == self.group.state() {
            debug!(
                slave = %change.entity,
                state = %change.new,
                "slave caught up with group state"
            );
            return Ok(());
        }

        debug!(
            id = %self.group.id(),
            slave = %change.entity,
            new = %change.new,
            "slave changed; forwarding target state to master"
        );
        // The master-changed reaction performs the group-wide update once
        // this command lands; slaves are never commanded from here.
        self.commands
            .set_state(std::slice::from_ref(self.group.master()), command)
            .await?;
        Ok(())
    }

    /// Direct group command: drive the master, then the group, to the target.
    async fn apply(&mut self, command: SwitchCommand) -> Result<(), SyncError> {
        if command.group_state() == self.group.state() {
            debug!(id = %self.group.id(), %command, "group already in target state");
            return Ok(());
        }

        debug!(id = %self.group.id(), %command, "applying group command");
        self.commands
            .set_state(std::slice::from_ref(self.group.master()), command)
            .await?;
        self.group.transition(command.group_state());
        self.resync_slaves(command).await?;
        self.publish().await;
        Ok(())
    }

    /// Issue one bulk command per capability domain, covering every slave
    /// whose read state is binary and differs from the target. Unreadable
    /// slaves are left alone until they report a real state again.
    async fn resync_slaves(&self, command: SwitchCommand) -> Result<(), SyncError> {
        for (domain, members) in self.group.slaves_by_capability() {
            let pending: Vec<EntityRef> = members
                .into_iter()
                .filter(|slave| match self.states.state_of(slave) {
                    Some(state) => state.is_binary() && state != command.target_state(),
                    None => false,
                })
                .cloned()
                .collect();

            if pending.is_empty() {
                continue;
            }
            debug!(
                id = %self.group.id(),
                domain,
                count = pending.len(),
                %command,
                "resyncing slaves"
            );
            self.commands.set_state(&pending, command).await?;
        }
        Ok(())
    }

    async fn publish(&self) {
        if let Err(err) = self.publisher.publish(self.group.snapshot()).await {
            warn!(id = %self.group.id(), %err, "failed to publish group state");
        }
    }
}
