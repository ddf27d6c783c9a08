use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use lights::LightId;
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "/data/lights/config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VrPolicyKind {
    #[default]
    Ignore,
    SuppressIndicators,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    /// Overrides `persist.sys.lightbar_mode` when set.
    pub buttons_light_mode: Option<i64>,
    /// File holding the brightness requested by the display stack.
    pub brightness_source: Option<PathBuf>,
    /// Full-scale value of `brightness_source`.
    pub max_source_brightness: u32,
    pub poll_interval_ms: u64,
    pub buttons_timeout_secs: u64,
    pub input_devices: Vec<PathBuf>,
    pub vr_policy: VrPolicyKind,
    /// File holding the VR session state, `1` while a session is active.
    pub vr_mode_source: Option<PathBuf>,
    /// LED class device per light: a name under /sys/class/leds, or an
    /// absolute path.
    pub lights: HashMap<LightId, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            buttons_light_mode: None,
            brightness_source: None,
            max_source_brightness: 255,
            poll_interval_ms: 50,
            buttons_timeout_secs: 5,
            input_devices: Vec::new(),
            vr_policy: VrPolicyKind::default(),
            vr_mode_source: None,
            lights: HashMap::new(),
        }
    }
}

impl Config {
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or_else(|_| {
            warn!("unknown log level {:?}, using info", self.log_level);
            LevelFilter::Info
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn buttons_timeout(&self) -> Duration {
        Duration::from_secs(self.buttons_timeout_secs)
    }
}

/// Load the config at `path`. A missing file yields the defaults.
pub async fn parse_config<P>(path: P) -> Result<Config, ConfigError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, using default config", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(ConfigError::Read(path.to_path_buf(), e)),
    }
}
