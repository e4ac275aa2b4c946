//! Mode decoder: inbound payload bytes → [`DriverState`].
//!
//! 1. Reject oversized and non-UTF-8 payloads.
//! 2. Parse as a JSON object; anything else is malformed.
//! 3. Read `mode`, falling back to `mood`; absent keys decode to
//!    `Unknown`.
//! 4. Exact-match the string value through [`DriverState::from_label`].
//!
//! Pure and side-effect free.  Logging is the caller's job.

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::mode::{DriverState, KEY_MODE, KEY_MOOD};

/// Largest payload accepted from the channel, in bytes.
pub const MAX_PAYLOAD: usize = 512;

/// Decode a raw payload into a validated state.
pub fn decode(payload: &[u8]) -> Result<DriverState, DecodeError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(DecodeError::TooLarge);
    }
    let text = core::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;
    let map: Map<String, Value> =
        serde_json::from_str(text).map_err(|_| DecodeError::MalformedPayload)?;

    let value = map.get(KEY_MODE).or_else(|| map.get(KEY_MOOD));
    Ok(match value {
        Some(Value::String(label)) => DriverState::from_label(label),
        // Recognised key with a non-string value, or no key at all.
        _ => DriverState::Unknown,
    })
}
