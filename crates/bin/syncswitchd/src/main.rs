//! # syncswitchd — synchronised switch daemon
//!
//! Composition root that wires configured groups against the bundled
//! virtual hub and runs them until interrupted.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env var overrides)
//! - Install the tracing subscriber
//! - Seed the virtual hub with every configured member entity
//! - Construct and activate one group synchroniser per configured group
//! - Run each synchroniser on its own task until ctrl-c
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use syncswitch_adapter_virtual::VirtualHub;
use syncswitch_app::services::group_sync::GroupSynchroniser;
use syncswitch_domain::state::EntityState;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    if config.groups.is_empty() {
        info!("no groups configured; add [[groups]] entries to syncswitch.toml");
    }

    // Seed the hub so every configured member has a readable state.
    let hub = Arc::new(VirtualHub::new());
    for group in &config.groups {
        hub.insert(group.master.clone(), EntityState::Off);
        for slave in &group.slaves {
            hub.insert(slave.clone(), EntityState::Off);
        }
    }

    let mut tasks = Vec::new();
    for group_config in config.groups {
        let mut synchroniser = GroupSynchroniser::new(
            group_config,
            Arc::clone(&hub),
            Arc::clone(&hub),
            Arc::clone(&hub),
            Arc::clone(&hub),
        )?;
        synchroniser.activate().await?;
        tasks.push(tokio::spawn(async move {
            synchroniser.run().await;
        }));
    }

    info!(groups = tasks.len(), "syncswitchd running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    for task in &tasks {
        task.abort();
    }
    Ok(())
}
