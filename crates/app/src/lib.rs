//! # syncswitch-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port traits** the host environment implements:
//!   - [`ports::StateEventSource`] — subscribe to state-change notifications
//!   - [`ports::StateReader`] — synchronous last-known-state lookup
//!   - [`ports::CommandSink`] — awaited bulk on/off commands
//!   - [`ports::GroupStatePublisher`] — expose the group's own state
//! - Provide the [`services::group_sync::GroupSynchroniser`] use-case that
//!   keeps a group's master and slaves in lock-step
//! - Provide **in-process infrastructure** (state-change bus) that doesn't
//!   need IO
//!
//! ## Dependency rule
//! Depends on `syncswitch-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
