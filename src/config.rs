//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    pub api: ApiCfg,
    /// Live-data polling.
    pub refresh: RefreshCfg,
    /// Documentation links opened from the main menu.
    pub links: LinksCfg,
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCfg {
    /// Base URL of the TurboCloud API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Polling period for live screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshCfg {
    /// Milliseconds between refresh ticks.
    pub period_ms: u64,
}

/// External documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinksCfg {
    pub getting_started: String,
    pub docs: String,
}

impl RefreshCfg {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms.max(100))
    }
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

impl Default for Config {
    /// Defaults match a backend running on the same host.
    fn default() -> Self {
        Self {
            api: ApiCfg {
                base_url: "http://localhost:5445/".into(),
                timeout_secs: 10,
            },
            refresh: RefreshCfg { period_ms: 2000 },
            links: LinksCfg {
                getting_started: "https://turbocloud.dev/docs/getting-started".into(),
                docs: "https://turbocloud.dev/docs".into(),
            },
        }
    }
}
