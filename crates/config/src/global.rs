//! Process-wide configuration snapshot
//!
//! The snapshot is published once, normally from `main` before any worker
//! starts. Until then [`settings`] returns [`Config::EMPTY`]. Components that
//! can take an explicit `&Config` should; this module exists for the code
//! that cannot have one threaded through.

use crate::error::{ConfigError, Result};
use crate::loader::ConfigLoader;
use crate::schema::Config;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

static PUBLISHED: OnceLock<Config> = OnceLock::new();
static UNLOADED: Config = Config::EMPTY;

/// Load the configuration file and publish it process-wide
///
/// A failed load leaves the published state untouched.
pub fn load<P: AsRef<Path>>(config_path: P) -> Result<&'static Config> {
    let config_path = config_path.as_ref();
    let config = ConfigLoader::load(config_path)?;
    publish_from(config, &config_path.display().to_string())
}

/// Publish an already resolved configuration
pub fn publish(config: Config) -> Result<&'static Config> {
    publish_from(config, "<memory>")
}

/// The published configuration, or [`Config::EMPTY`] if nothing was published
pub fn settings() -> &'static Config {
    PUBLISHED.get().unwrap_or(&UNLOADED)
}

/// Whether a configuration has been published
pub fn is_loaded() -> bool {
    PUBLISHED.get().is_some()
}

fn publish_from(config: Config, origin: &str) -> Result<&'static Config> {
    let mut installed = false;
    let published = PUBLISHED.get_or_init(|| {
        installed = true;
        config.clone()
    });

    if installed {
        info!(origin, "Configuration published");
        return Ok(published);
    }

    // Republishing the same values is a no-op
    if *published == config {
        debug!(origin, "Configuration already published with identical values");
        Ok(published)
    } else {
        warn!(origin, "Refusing to replace published configuration");
        Err(ConfigError::AlreadyPublished {
            origin: origin.to_string(),
        })
    }
}
