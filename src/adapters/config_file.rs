//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`].  Layering: defaults, then the optional file,
//! then environment overrides, then validation.  A missing file is only an
//! error when a path was given explicitly.

use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::RelayConfig;

/// Environment lookup used for overrides.
pub type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub struct JsonFileConfig {
    path: Option<PathBuf>,
    env: EnvLookup,
}

impl JsonFileConfig {
    /// Read from `path` (if any) and the process environment.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            env: process_env,
        }
    }

    /// Replace the environment lookup.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Parse a JSON document onto the defaults.
    pub fn parse(text: &str) -> Result<RelayConfig, ConfigError> {
        serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ConfigError::NotFound,
                    _ => ConfigError::IoError,
                })?;
                info!("Config loaded from {}", path.display());
                Self::parse(&text)?
            }
            None => RelayConfig::default(),
        };
        config.apply_env(self.env)?;
        config.validate()?;
        Ok(config)
    }
}
