//! Outbound application events.
//!
//! The [`DisplayController`](super::service::DisplayController) and the
//! [`StatePublisher`](super::publisher::StatePublisher) emit these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::error::{DecodeError, TransportError};
use crate::fsm::StateId;
use crate::mode::DriverState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The display controller has started (carries initial state).
    Started(StateId),

    /// A decoded state was applied to the indicator.
    IndicatorChanged { from: DriverState, to: DriverState },

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A new blink session began.
    AlertStarted,

    /// The blink session ran its full duration.
    AlertExpired { elapsed_ms: u64 },

    /// A `normal` notification ended the blink session early.
    AlertCancelled { elapsed_ms: u64 },

    /// An inbound payload was discarded.
    MessageDropped(DecodeError),

    /// A well-formed payload carried an unrecognised label.
    UnknownState,

    /// A notification left the publisher.
    Published { state: DriverState },

    /// A notification could not be published.
    PublishFailed(TransportError),
}
