//! Unified error types for the drive-mode pipeline.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! binary's startup error handling uniform.  Per-message failures never
//! reach this type: the decoder and display loop log and drop them.
//! All variants are `Copy` so they can be passed through events and
//! returned from ports without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The message transport failed (connect, subscribe, publish).
    Transport(TransportError),
    /// An inbound payload could not be decoded.
    Decode(DecodeError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures at the message-channel boundary.
///
/// Surfaced to the caller of the publisher; never fatal to a detection
/// cycle.  Only a failure to subscribe at startup stops the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Could not reach or handshake with the broker.
    Connect,
    /// Subscription request was rejected or could not be queued.
    Subscribe,
    /// Publish request could not be queued or was not acknowledged.
    Publish,
    /// The connection dropped while an operation was in flight.
    Disconnected,
    /// The outbound payload could not be serialised.
    Encode,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "broker connect failed"),
            Self::Subscribe => write!(f, "subscribe failed"),
            Self::Publish => write!(f, "publish failed"),
            Self::Disconnected => write!(f, "broker disconnected"),
            Self::Encode => write!(f, "payload encode failed"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Why an inbound payload was discarded.
///
/// Every variant is a `MalformedPayload` condition in the pipeline's
/// taxonomy; the split only sharpens the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload bytes are not valid UTF-8.
    NotUtf8,
    /// Payload is not a JSON object.
    MalformedPayload,
    /// Payload exceeds the inbound buffer.
    TooLarge,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotUtf8 => write!(f, "payload is not UTF-8"),
            Self::MalformedPayload => write!(f, "malformed payload"),
            Self::TooLarge => write!(f, "payload too large"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
