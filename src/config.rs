use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_POLL_SECS: u64 = 30;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one JSON document per tracker (`APP_DATA_DIR`).
    pub data_dir: PathBuf,
    pub port: u16,
    /// How often the unread notification count is refreshed (`NOTIFICATION_POLL_SECS`).
    pub poll_interval: Duration,
    /// Fill empty trackers with sample content on first run (`APP_SEED_SAMPLES`).
    pub seed_samples: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: DEFAULT_PORT,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            seed_samples: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: lookup("APP_DATA_DIR")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            poll_interval: lookup("NOTIFICATION_POLL_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            seed_samples: lookup("APP_SEED_SAMPLES")
                .map(|value| !matches!(value.trim(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.seed_samples),
        }
    }
}
