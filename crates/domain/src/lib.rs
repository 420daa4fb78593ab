//! # syncswitch-domain
//!
//! Pure domain model for the synchronised switch group.
//!
//! ## Responsibilities
//! - Foundational types: entity references, state values, timestamps
//! - Define the **Group** aggregate (master + slaves) and enforce its invariants
//! - Define **state-change events** as observed from the host environment
//! - Define the **commands** the synchroniser may issue
//! - Error conventions shared across the workspace
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod entity_ref;
pub mod error;
pub mod event;
pub mod group;
pub mod state;
pub mod time;
