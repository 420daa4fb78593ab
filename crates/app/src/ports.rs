//! Port definitions — traits the host environment implements.
//!
//! Ports are the boundaries between the synchronisation core and the outside
//! world. They are defined here (in `app`) so that both the use-case layer
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod commands;
pub mod events;
pub mod publisher;
pub mod states;

pub use commands::CommandSink;
pub use events::{StateEventSource, Subscription};
pub use publisher::GroupStatePublisher;
pub use states::StateReader;
