//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DisplayController / StatePublisher (domain)
//! ```
//!
//! Driven adapters (render surface, broker client, event sinks, config
//! store) implement these traits.  The domain consumes them via generics
//! at call sites, so the core never touches a socket or a screen.

use crate::config::RelayConfig;
use crate::error::TransportError;
use crate::mode::{DriverState, Rgb};

// ───────────────────────────────────────────────────────────────
// Render port (driven adapter: domain → display)
// ───────────────────────────────────────────────────────────────

/// Display-side primitives.  Synchronous and non-blocking.
pub trait RenderSink {
    /// Draw the mode indicator.  Idempotent; always safe to call.
    fn set_indicator(&mut self, state: DriverState);

    /// Draw (or redraw) the alert text in the given foreground colour.
    fn show_alert_text(&mut self, text: &str, colour: Rgb);

    /// Remove the alert text.  No-op when nothing is shown.
    fn hide_alert_text(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain → message channel)
// ───────────────────────────────────────────────────────────────

/// Outbound side of the message channel.
pub trait TransportPort {
    /// Publish one payload on `topic`.  Fire-and-forget from the caller's
    /// point of view; the error only reports this attempt.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Message handler (driving adapter: message channel → domain)
// ───────────────────────────────────────────────────────────────

/// Single entry point invoked by a channel client for every inbound
/// message.  Implementations must not block for long; the display side
/// only enqueues.
pub trait MessageHandler {
    fn on_message(&mut self, topic: &str, payload: &[u8]);

    /// The channel client gave up on the connection.  No further messages
    /// will arrive.
    fn on_disconnect(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads configuration.
///
/// Implementations return [`RelayConfig::default()`] when no stored
/// config exists and MUST validate what they return.
pub trait ConfigPort {
    fn load(&self) -> Result<RelayConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The named config file does not exist.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::NotFound => Self::Config("config not found"),
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("config I/O error"),
        }
    }
}
