//! Layered configuration: defaults → YAML file → `REBM_*` env → CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_BASE_URL;

pub const ENV_PREFIX: &str = "REBM_";

/// Longest reservation the CLI will compute from an hour count (one year).
pub const MAX_RESERVATION_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the ReBM API.
    pub api_url: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Expiry pre-filled for new reservations, in hours from now.
    pub default_reservation_hours: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            default_reservation_hours: 1,
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/rebm/config.yaml` on Linux).
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("rebm").join("config.yaml"))
    }

    /// CLI flags override every other layer.
    pub fn apply_overrides(&mut self, api_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
    }
}

/// Build the provider stack. An explicit file must exist; the default file is
/// optional.
pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        None => {
            if let Ok(path) = Config::path() {
                figment = figment.merge(Yaml::file(path));
            }
        }
    }

    Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
}

pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let config: Config = figment(explicit)?
        .extract()
        .context("loading configuration")?;

    if !(1..=MAX_RESERVATION_HOURS).contains(&config.default_reservation_hours) {
        bail!(
            "default_reservation_hours must be between 1 and {}, got {}",
            MAX_RESERVATION_HOURS,
            config.default_reservation_hours
        );
    }
    Ok(config)
}
