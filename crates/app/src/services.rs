//! Use-case services orchestrating domain objects through ports.

pub mod group_sync;
