//! System configuration parameters
//!
//! All tunable parameters for the relay.  Values come from
//! [`RelayConfig::default`], optionally overlaid by a JSON file
//! (see [`crate::adapters::config_file`]) and finally by the
//! `MQTT_BROKER_HOST` / `MQTT_BROKER_PORT` environment variables.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::mode::Rgb;

/// Environment variable overriding [`BrokerConfig::host`].
pub const ENV_BROKER_HOST: &str = "MQTT_BROKER_HOST";
/// Environment variable overriding [`BrokerConfig::port`].
pub const ENV_BROKER_PORT: &str = "MQTT_BROKER_PORT";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    pub broker: BrokerConfig,
    pub topics: TopicConfig,
    pub alert: AlertConfig,
    pub classifier: ClassifierConfig,
}

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    /// MQTT keep-alive interval (seconds)
    pub keep_alive_secs: u16,
    /// Client ids are `<prefix>-<role>`
    pub client_id_prefix: String,
    /// Request queue depth of the MQTT client
    pub channel_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            keep_alive_secs: 5,
            client_id_prefix: "drivemode".to_string(),
            channel_capacity: 10,
        }
    }
}

/// Topic names shared by publisher and subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Drive-mode notifications (publisher → display)
    pub mode: String,
    /// Raw emotion samples (face model → classifier)
    pub mood: String,
    /// Heart-rate samples (wearable → classifier)
    pub heart_rate: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            mode: "drive.mode/2/0/4/8001".to_string(),
            mood: "driver/mood".to_string(),
            heart_rate: "driver/heart_rate".to_string(),
        }
    }
}

/// Blink-alert behaviour on the cluster display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Text shown while alerting
    pub text: String,
    /// Alert lifetime (milliseconds)
    pub duration_ms: u32,
    /// Interval between blink frames (milliseconds)
    pub blink_period_ms: u32,
    /// Foreground colour on even phases
    pub colour_on: Rgb,
    /// Foreground colour on odd phases
    pub colour_off: Rgb,
    /// Restart the alert window when `restricted` arrives mid-alert
    pub rearm_on_restricted: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            text: "\u{26a0} Driver Anger Detected!".to_string(),
            duration_ms: 30_000,
            blink_period_ms: 500, // two toggles per second
            colour_on: (255, 0, 0),
            colour_off: (0, 0, 0),
            rearm_on_restricted: false,
        }
    }
}

/// Mood / heart-rate aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Analysis window (seconds)
    pub analysis_interval_secs: u32,
    /// Heart rate above this counts as elevated (bpm)
    pub elevated_heart_rate_bpm: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            analysis_interval_secs: 10,
            elevated_heart_rate_bpm: 100,
        }
    }
}

impl RelayConfig {
    /// Overlay broker host/port from the environment.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a
    /// closure over a fixed table.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = lookup(ENV_BROKER_HOST) {
            self.broker.host = host;
        }
        if let Some(port) = lookup(ENV_BROKER_PORT) {
            self.broker.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationFailed("MQTT_BROKER_PORT is not a port number"))?;
        }
        Ok(())
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("broker.host is empty"));
        }
        if self.broker.port == 0 {
            return Err(ConfigError::ValidationFailed("broker.port must be non-zero"));
        }
        if self.broker.channel_capacity == 0 {
            return Err(ConfigError::ValidationFailed("broker.channel_capacity must be non-zero"));
        }
        if self.topics.mode.is_empty() || self.topics.mood.is_empty() || self.topics.heart_rate.is_empty() {
            return Err(ConfigError::ValidationFailed("topic names must be non-empty"));
        }
        if self.alert.blink_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("alert.blink_period_ms must be non-zero"));
        }
        if self.alert.duration_ms <= self.alert.blink_period_ms {
            return Err(ConfigError::ValidationFailed(
                "alert.duration_ms must exceed alert.blink_period_ms",
            ));
        }
        if self.classifier.analysis_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "classifier.analysis_interval_secs must be non-zero",
            ));
        }
        Ok(())
    }

    /// `host:port` for log lines.
    pub fn broker_addr(&self) -> String {
        format!("{}:{}", self.broker.host, self.broker.port)
    }
}
