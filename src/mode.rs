//! Driver-state vocabulary and the notification wire format.
//!
//! ```text
//!  detector label ──▶ DriverState::from_label ──▶ Notification (JSON)
//!                                                     │
//!                                  topic: drive.mode/2/0/4/8001
//!                                                     ▼
//!                                              decoder::decode
//! ```
//!
//! The lookup is an exact, case-sensitive match.  Emotion labels coming
//! straight from a face model (`anger`, `happy`, ...) are **not**
//! reconciled with the mode vocabulary; they map to
//! [`DriverState::Unknown`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Key carrying a decided drive mode.
pub const KEY_MODE: &str = "mode";
/// Key carrying a raw emotion label.
pub const KEY_MOOD: &str = "mood";

/// Discrete driver condition relevant to the cluster display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriverState {
    Normal,
    Restricted,
    /// Any label outside the mode vocabulary.
    #[default]
    Unknown,
}

impl DriverState {
    /// Map a free-text label to a state.  Only `normal` and `restricted`
    /// are recognised.
    pub fn from_label(label: &str) -> Self {
        match label {
            "normal" => Self::Normal,
            "restricted" => Self::Restricted,
            _ => Self::Unknown,
        }
    }

    /// Wire label for this state.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Restricted => "restricted",
            Self::Unknown => "unknown",
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Outbound notification body.
///
/// Serialised as a flat JSON object.  Optional fields are omitted rather
/// than written as `null` so the payload stays a string-valued mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Notification {
    /// Notification for a raw detector label.  The label is carried
    /// verbatim under `mood`; `mode` holds its mapped state.
    pub fn from_label(label: &str) -> Self {
        Self {
            mode: DriverState::from_label(label).label().to_string(),
            mood: Some(label.to_string()),
            reason: None,
        }
    }

    /// Notification for an already-decided state.
    pub fn from_state(state: DriverState, reason: Option<String>) -> Self {
        Self {
            mode: state.label().to_string(),
            mood: None,
            reason,
        }
    }

    /// Encode as UTF-8 JSON bytes.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
