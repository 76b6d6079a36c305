//! Configuration for the orrery host.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`ORRERY_FRAMES`, `ORRERY_FIXED_TPF`, ...)
//! 2. The file named by `ORRERY_CONFIG`, else `./orrery.toml`
//! 3. Built-in defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use orrery_scene::OrbitRates;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ORRERY_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "orrery.toml";

/// Main orrery configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Angular velocities of the animated nodes
    pub orbit: OrbitRates,
    /// Frame loop settings
    pub host: HostConfig,
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Frames to run before exiting, 0 runs forever
    pub frames: u64,
    /// Constant time step in seconds instead of the measured one
    pub fixed_tpf: Option<f32>,
    /// Frame rate to pace the loop at, 0 disables pacing
    pub target_fps: f32,
    /// Log world positions every N frames, 0 disables reports
    pub report_every: u64,
    /// Clamp for a single measured time step, in seconds
    pub max_delta: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fixed_tpf: None,
            target_fps: 60.0,
            report_every: 60,
            max_delta: orrery_core::DEFAULT_MAX_DELTA,
        }
    }
}

impl HostConfig {
    /// Wall-clock time one frame may take when pacing, `None` when pacing is
    /// off or the period does not fit a [`Duration`].
    pub fn frame_budget(&self) -> Option<Duration> {
        if self.target_fps > 0.0 {
            Duration::try_from_secs_f32(1.0 / self.target_fps).ok()
        } else {
            None
        }
    }
}

impl AppConfig {
    /// Reject values the frame loop cannot work with.
    pub fn validate(&self) -> orrery_core::Result<()> {
        let host = &self.host;
        if let Some(tpf) = host.fixed_tpf
            && (!tpf.is_finite() || tpf < 0.0)
        {
            return Err(orrery_core::Error::Config(format!(
                "fixed_tpf must be finite and non-negative, got {tpf}"
            )));
        }
        if !host.target_fps.is_finite() || host.target_fps < 0.0 {
            return Err(orrery_core::Error::Config(format!(
                "target_fps must be finite and non-negative, got {}",
                host.target_fps
            )));
        }
        if host.target_fps > 0.0 && host.frame_budget().is_none() {
            return Err(orrery_core::Error::Config(format!(
                "target_fps {} is too small to pace frames",
                host.target_fps
            )));
        }
        if !host.max_delta.is_finite() || host.max_delta <= 0.0 {
            return Err(orrery_core::Error::Config(format!(
                "max_delta must be positive, got {}",
                host.max_delta
            )));
        }
        Ok(())
    }
}

/// Configuration loader with multiple source support
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<AppConfig> {
        let mut config = Self::load_from_files()?;
        Self::apply_overrides(&mut config, |key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn load_from_files() -> Result<AppConfig> {
        for path in Self::find_config_files() {
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(AppConfig::default())
    }

    fn find_config_files() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(config_path) = env::var(CONFIG_ENV) {
            paths.push(PathBuf::from(config_path));
        }
        if let Ok(current_dir) = env::current_dir() {
            paths.push(current_dir.join(DEFAULT_CONFIG_FILE));
        }
        paths
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<AppConfig> {
        let content = fs::read_to_string(path)
            .map_err(orrery_core::Error::from)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<AppConfig> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `ORRERY_*` overrides. `lookup` resolves a variable name.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
        let host = &mut config.host;

        if let Some(frames) = parsed(&lookup, "ORRERY_FRAMES") {
            host.frames = frames;
        }
        if let Some(raw) = lookup("ORRERY_FIXED_TPF") {
            if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
                host.fixed_tpf = None;
            } else if let Ok(tpf) = raw.parse() {
                host.fixed_tpf = Some(tpf);
            } else {
                warn!("Ignoring ORRERY_FIXED_TPF={raw:?}: not a number");
            }
        }
        if let Some(fps) = parsed(&lookup, "ORRERY_TARGET_FPS") {
            host.target_fps = fps;
        }
        if let Some(every) = parsed(&lookup, "ORRERY_REPORT_EVERY") {
            host.report_every = every;
        }
        if let Some(max_delta) = parsed(&lookup, "ORRERY_MAX_DELTA") {
            host.max_delta = max_delta;
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {key}={raw:?}: could not parse");
            None
        }
    }
}
