// src/config/mod.rs - Server configuration (TOML file + environment override)
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Environment variable overriding the listening TCP port (default 5680).
pub const PORT_ENV_VAR: &str = "CAMMOVE_PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub motion: MotionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Reject connections from non-loopback peers.
    #[serde(default = "default_loopback_only")]
    pub loopback_only: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Camera travel speed used to derive the per-frame step distance.
    #[serde(default = "default_speed_px_per_sec")]
    pub speed_px_per_sec: f32,
}

// Default value functions
fn default_port() -> u16 {
    5680
}
fn default_loopback_only() -> bool {
    true
}
fn default_speed_px_per_sec() -> f32 {
    300.0
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            loopback_only: default_loopback_only(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_px_per_sec: default_speed_px_per_sec(),
        }
    }
}

/// Loads configuration from a TOML file and applies environment overrides.
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(config_path)?;
    let mut config: Config = toml::from_str(&contents)?;
    tracing::info!("Loaded configuration from TOML file: {}", config_path);
    config.apply_env_overrides();
    Ok(config)
}

impl Config {
    /// `CAMMOVE_PORT` takes precedence over the configured port.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(PORT_ENV_VAR) {
            match value.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Overriding listening port from {}: {}", PORT_ENV_VAR, port);
                    self.server.port = port;
                }
                Err(_) => {
                    tracing::warn!("Ignoring non-numeric {} value: {}", PORT_ENV_VAR, value);
                }
            }
        }
    }
}
