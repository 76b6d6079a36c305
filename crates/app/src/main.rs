//! Orrery - headless render host
//!
//! Builds the solar-system scene graph, then drives it frame by frame,
//! logging the world positions of the bodies as a renderer would draw them.

mod config;
mod host;

use anyhow::{Context, Result};
use tracing::info;

use config::ConfigLoader;
use host::Host;

fn main() -> Result<()> {
    // Initialize logging
    orrery_core::init_logging();
    info!("Starting orrery");

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let mut host = Host::new(&config).context("Failed to compose the scene")?;
    host.run()?;

    info!("Shutting down");
    Ok(())
}
