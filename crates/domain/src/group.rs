//! Group — the aggregate being synchronised.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entity_ref::EntityRef;
use crate::error::GroupConfigError;
use crate::state::GroupState;

/// Unique identifier for a group. Supplied by configuration, or generated
/// when the configuration omits one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Generate a random identifier (hyphen-less uuid).
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Construction surface for a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Stable identifier; generated when absent.
    #[serde(default)]
    pub unique_id: Option<GroupId>,
    /// Display name.
    pub name: String,
    /// The single reference entity whose state drives the group.
    pub master: EntityRef,
    /// Entities kept in sync with the master, in configuration order.
    pub slaves: Vec<EntityRef>,
    /// Capability-domain overrides, keyed by entity reference. Only used to
    /// batch outbound commands; defaults to each reference's domain prefix.
    #[serde(default)]
    pub capability: BTreeMap<EntityRef, String>,
}

/// A validated synchronised switch group.
///
/// Group state is never set from outside: it is initialised once at
/// activation and then only moved by master-triggered transitions (or a
/// direct group command), always through [`transition`](Self::transition).
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    name: String,
    master: EntityRef,
    slaves: Vec<EntityRef>,
    capability: BTreeMap<EntityRef, String>,
    state: GroupState,
    available: bool,
}

/// Externally-visible snapshot of a group, published to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub name: String,
    pub state: GroupState,
    pub available: bool,
    /// Master first, then slaves in configuration order.
    pub members: Vec<EntityRef>,
}

impl Group {
    /// Validate a configuration and build the group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupConfigError`] when the slave list is empty, contains
    /// the master, or contains duplicates.
    pub fn new(config: GroupConfig) -> Result<Self, GroupConfigError> {
        if config.slaves.is_empty() {
            return Err(GroupConfigError::NoSlaves);
        }
        if config.slaves.contains(&config.master) {
            return Err(GroupConfigError::MasterInSlaves(config.master));
        }
        let mut seen = HashSet::new();
        for slave in &config.slaves {
            if !seen.insert(slave) {
                return Err(GroupConfigError::DuplicateSlave(slave.clone()));
            }
        }

        Ok(Self {
            id: config.unique_id.unwrap_or_else(GroupId::random),
            name: config.name,
            master: config.master,
            slaves: config.slaves,
            capability: config.capability,
            state: GroupState::Unknown,
            available: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> &GroupId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn master(&self) -> &EntityRef {
        &self.master
    }

    #[must_use]
    pub fn slaves(&self) -> &[EntityRef] {
        &self.slaves
    }

    #[must_use]
    pub fn state(&self) -> GroupState {
        self.state
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    #[must_use]
    pub fn is_master(&self, entity: &EntityRef) -> bool {
        self.master == *entity
    }

    #[must_use]
    pub fn is_slave(&self, entity: &EntityRef) -> bool {
        self.slaves.contains(entity)
    }

    /// Master first, then slaves in configuration order.
    pub fn members(&self) -> impl Iterator<Item = &EntityRef> {
        std::iter::once(&self.master).chain(self.slaves.iter())
    }

    /// Move the group to a new state. A group in `Unknown` is unavailable.
    pub fn transition(&mut self, to: GroupState) {
        self.state = to;
        self.available = !matches!(to, GroupState::Unknown);
    }

    /// The capability domain used to batch commands for `entity`:
    /// the configured override, or the reference's own domain prefix.
    #[must_use]
    pub fn capability_domain<'a>(&'a self, entity: &'a EntityRef) -> &'a str {
        self.capability
            .get(entity)
            .map_or(entity.domain(), String::as_str)
    }

    /// Slaves grouped by capability domain, domains sorted, each batch in
    /// configuration order.
    #[must_use]
    pub fn slaves_by_capability(&self) -> BTreeMap<&str, Vec<&EntityRef>> {
        let mut batches: BTreeMap<&str, Vec<&EntityRef>> = BTreeMap::new();
        for slave in &self.slaves {
            batches
                .entry(self.capability_domain(slave))
                .or_default()
                .push(slave);
        }
        batches
    }

    /// The externally-visible snapshot published to the host.
    #[must_use]
    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            state: self.state,
            available: self.available,
            members: self.members().cloned().collect(),
        }
    }
}
