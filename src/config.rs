//! Code for the configuration of the application.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{Dialect, PrinterEndpoint};

/// The configuration of the application.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// The printer server to poll.
    pub printer: PrinterConfig,

    /// How often to poll.
    #[serde(default)]
    pub poll: PollConfig,
}

impl Config {
    /// Parse a configuration from a toml file.
    pub fn from_file(file: &Path) -> Result<Self> {
        let config = std::fs::read_to_string(file).with_context(|| format!("reading config {}", file.display()))?;
        Self::from_str(&config)
    }

    /// Parse a configuration from a toml string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(config: &str) -> Result<Self> {
        Ok(toml::from_str(config)?)
    }

    /// The endpoint described by the `[printer]` table.
    pub fn endpoint(&self) -> PrinterEndpoint {
        self.printer.clone().into()
    }
}

/// The `[printer]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrinterConfig {
    /// Hostname or IP address of the server.
    pub host: String,

    /// TCP port of the server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// API key sent with every request.
    #[serde(default)]
    pub api_key: String,

    /// Basic auth user, if the server sits behind one.
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password.
    #[serde(default)]
    pub password: Option<String>,

    /// `octoprint` or `moonraker`.
    pub dialect: Dialect,
}

fn default_port() -> u16 {
    80
}

impl From<PrinterConfig> for PrinterEndpoint {
    fn from(config: PrinterConfig) -> Self {
        PrinterEndpoint {
            host: config.host,
            port: config.port,
            api_key: config.api_key,
            username: config.username.unwrap_or_default(),
            password: config.password.unwrap_or_default(),
            dialect: config.dialect,
        }
    }
}

/// The `[poll]` table.
#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    /// Seconds between two updates.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl PollConfig {
    /// Time between two updates.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_interval_secs() -> u64 {
    10
}
