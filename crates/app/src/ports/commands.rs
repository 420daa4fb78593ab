//! Command port — awaited bulk on/off commands.

use std::future::Future;

use syncswitch_domain::command::SwitchCommand;
use syncswitch_domain::entity_ref::EntityRef;
use syncswitch_domain::error::CommandError;

/// Issues a command to set one or more entities on or off.
///
/// The returned future resolves only once the host reports completion; the
/// synchroniser relies on this to keep its reactions ordered.
pub trait CommandSink {
    fn set_state(
        &self,
        entities: &[EntityRef],
        command: SwitchCommand,
    ) -> impl Future<Output = Result<(), CommandError>> + Send;
}

impl<T: CommandSink + Send + Sync> CommandSink for std::sync::Arc<T> {
    fn set_state(
        &self,
        entities: &[EntityRef],
        command: SwitchCommand,
    ) -> impl Future<Output = Result<(), CommandError>> + Send {
        (**self).set_state(entities, command)
    }
}
