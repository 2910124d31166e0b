use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sections: Vec<EdgegridSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout: u64,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_poll_timeout() -> u64 {
    300
}

fn default_max_body() -> usize {
    131_072
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval: default_poll_interval(),
            poll_timeout: default_poll_timeout(),
        }
    }
}

/// EdgeGrid API client credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgegridSection {
    pub name: String,
    pub host: String,
    pub client_token: String,
    pub client_secret: String,
    pub access_token: String,
    #[serde(default = "default_max_body")]
    pub max_body: usize,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn get_section(&self, name: &str) -> Result<&EdgegridSection> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .with_context(|| format!("Credential section not found: {}", name))
    }
}
