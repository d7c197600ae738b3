// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ExportError;
use crate::utils::write_atomic;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
/// Written by `init` when no key is given; blocks fetching until replaced.
pub const API_KEY_PLACEHOLDER: &str = "INSERT YOUR KEY HERE";
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    /// Extra attempts after the first one for transient failures.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub alpha_vantage: String,
    pub yahoo_chart: String,
    pub yahoo_quote_summary: String,
    pub yahoo_cookie: String,
    pub yahoo_crumb: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            alpha_vantage: "https://www.alphavantage.co/query".to_string(),
            yahoo_chart: "https://query1.finance.yahoo.com/v8/finance/chart/".to_string(),
            yahoo_quote_summary: "https://query1.finance.yahoo.com/v10/finance/quoteSummary/"
                .to_string(),
            yahoo_cookie: "https://fc.yahoo.com/consent".to_string(),
            yahoo_crumb: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            http: HttpSettings::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn has_api_key(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }

    /// The key for network fetches, or a user-facing configuration error.
    pub fn require_api_key(&self) -> Result<&str, ExportError> {
        if self.has_api_key() {
            Ok(self.api_key.trim())
        } else {
            Err(ExportError::Configuration(format!(
                "Please provide an API key ({} or the {} environment variable)",
                DEFAULT_CONFIG_PATH, API_KEY_ENV
            )))
        }
    }

    /// Output workbook location for `symbol`.
    pub fn workbook_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{}_statements.xlsx", symbol))
    }
}

/// Reads the configuration file, then lets `ALPHAVANTAGE_API_KEY` override the key.
///
/// A missing file is only an error when the environment does not supply a key either.
pub fn load_config(path: &Path) -> Result<Config, ExportError> {
    let env_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty());

    let mut config = match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str::<Config>(&text).map_err(|e| {
            ExportError::Configuration(format!("error reading {}: {}", path.display(), e))
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && env_key.is_some() => {
            Config::default()
        }
        Err(e) => {
            return Err(ExportError::Configuration(format!(
                "error reading {}: {} (run `statements-rs init` first)",
                path.display(),
                e
            )))
        }
    };

    if let Some(key) = env_key {
        config.api_key = key;
    }
    Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> Result<(), ExportError> {
    let text = serde_json::to_string_pretty(config)?;
    write_atomic(path, text.as_bytes())
}

/// Creates the configuration file. Returns `false` when one already exists
/// and `force` is not set.
pub fn init_config(path: &Path, api_key: Option<&str>, force: bool) -> Result<bool, ExportError> {
    if path.exists() && !force {
        return Ok(false);
    }

    let api_key = api_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(API_KEY_PLACEHOLDER);
    let config = Config {
        api_key: api_key.to_string(),
        ..Config::default()
    };
    save_config(path, &config)?;
    Ok(true)
}
