//! Outbound commands — the only two things the synchroniser ever asks of an entity.

use serde::{Deserialize, Serialize};

use crate::state::{EntityState, GroupState};

/// A bulk on/off command issued to one or more entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchCommand {
    TurnOn,
    TurnOff,
}

impl SwitchCommand {
    /// Derive the command that reproduces `state` on another entity.
    ///
    /// Only binary states map to a command; there is no way to command an
    /// entity into `unknown` or `unavailable`.
    #[must_use]
    pub fn from_state(state: &EntityState) -> Option<Self> {
        match state {
            EntityState::On => Some(Self::TurnOn),
            EntityState::Off => Some(Self::TurnOff),
            _ => None,
        }
    }

    /// The entity state this command drives its targets to.
    #[must_use]
    pub fn target_state(self) -> EntityState {
        match self {
            Self::TurnOn => EntityState::On,
            Self::TurnOff => EntityState::Off,
        }
    }

    /// The group state reached once this command has been applied.
    #[must_use]
    pub fn group_state(self) -> GroupState {
        match self {
            Self::TurnOn => GroupState::On,
            Self::TurnOff => GroupState::Off,
        }
    }
}

impl std::fmt::Display for SwitchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnOn => f.write_str("turn_on"),
            Self::TurnOff => f.write_str("turn_off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_derive_command_from_binary_states_only() {
        assert_eq!(
            SwitchCommand::from_state(&EntityState::On),
            Some(SwitchCommand::TurnOn)
        );
        assert_eq!(
            SwitchCommand::from_state(&EntityState::Off),
            Some(SwitchCommand::TurnOff)
        );
        assert_eq!(SwitchCommand::from_state(&EntityState::Unknown), None);
        assert_eq!(SwitchCommand::from_state(&EntityState::Unavailable), None);
        assert_eq!(
            SwitchCommand::from_state(&EntityState::Other("standby".to_string())),
            None
        );
    }

    #[test]
    fn should_map_command_to_target_state() {
        assert_eq!(SwitchCommand::TurnOn.target_state(), EntityState::On);
        assert_eq!(SwitchCommand::TurnOff.target_state(), EntityState::Off);
    }

    #[test]
    fn should_map_command_to_group_state() {
        assert_eq!(SwitchCommand::TurnOn.group_state(), GroupState::On);
        assert_eq!(SwitchCommand::TurnOff.group_state(), GroupState::Off);
    }

    #[test]
    fn should_display_host_service_names() {
        assert_eq!(SwitchCommand::TurnOn.to_string(), "turn_on");
        assert_eq!(SwitchCommand::TurnOff.to_string(), "turn_off");
    }
}
