//! State values — what entities report, and what the group holds.

use serde::{Deserialize, Serialize};

/// Last observed operational state of a member entity.
///
/// Hosts report states as free-form strings. The binary values and the two
/// sentinel values get their own variants; everything else is preserved in
/// [`Other`](Self::Other) so it can be surfaced in logs and errors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
    Other(String),
}

impl EntityState {
    /// Whether this is one of the two states the group model operates on.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::On | Self::Off)
    }

    /// Whether the entity currently has no usable reading.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unknown | Self::Unavailable)
    }
}

impl From<String> for EntityState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            "unknown" => Self::Unknown,
            "unavailable" => Self::Unavailable,
            _ => Self::Other(value),
        }
    }
}

impl From<EntityState> for String {
    fn from(state: EntityState) -> String {
        state.to_string()
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::Other(value) => f.write_str(value),
        }
    }
}

/// The group's canonical on/off/unknown value, independent of any one
/// entity's live reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupState {
    On,
    Off,
    #[default]
    Unknown,
}

impl GroupState {
    /// The command that would drive an entity to this state, if any.
    #[must_use]
    pub fn command(self) -> Option<crate::command::SwitchCommand> {
        match self {
            Self::On => Some(crate::command::SwitchCommand::TurnOn),
            Self::Off => Some(crate::command::SwitchCommand::TurnOff),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for GroupState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
