use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Watcher settings, loaded from the config directory at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub stock_url: String,
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            stock_url: "https://fruityblox.com/stock".to_owned(),
            interval: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl WatchConfig {
    /// Read settings from `path`, keeping defaults when the file is missing
    /// or unparsable.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Per-user config directory for the bot (`~/.config/restock` on Linux).
    pub fn config_dir() -> PathBuf {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("restock");
        dir
    }
}
