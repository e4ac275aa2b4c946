//! State publisher: the detector-side half of the relay.
//!
//! Stateless: every call maps, encodes and publishes exactly one
//! notification.  A transport failure is returned to the caller and
//! leaves nothing behind, so the next call starts clean.

use log::{info, warn};

use crate::error::TransportError;
use crate::mode::{DriverState, Notification};

use super::events::AppEvent;
use super::ports::{EventSink, TransportPort};

/// Publishes driver-state notifications on one well-known topic.
#[derive(Debug, Clone)]
pub struct StatePublisher {
    topic: String,
}

impl StatePublisher {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Map a raw detector label and publish it.  Returns the mapped state.
    ///
    /// Labels that do not map are still published; the display side
    /// treats them as unknown.
    pub fn report(
        &self,
        label: &str,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<DriverState, TransportError> {
        let state = DriverState::from_label(label);
        if !state.is_known() {
            warn!("Publishing unrecognised label {:?}", label);
        }
        self.send(state, &Notification::from_label(label), transport, sink)?;
        Ok(state)
    }

    /// Publish an already-decided state, optionally with a reason.
    pub fn publish_state(
        &self,
        state: DriverState,
        reason: Option<String>,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<(), TransportError> {
        self.send(state, &Notification::from_state(state, reason), transport, sink)
    }

    fn send(
        &self,
        state: DriverState,
        notification: &Notification,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<(), TransportError> {
        let result = notification
            .to_payload()
            .map_err(|_| TransportError::Encode)
            .and_then(|payload| transport.publish(&self.topic, &payload));

        match result {
            Ok(()) => {
                info!("Published {} on {}", state, self.topic);
                sink.emit(&AppEvent::Published { state });
                Ok(())
            }
            Err(e) => {
                warn!("Publish of {} on {} failed: {}", state, self.topic, e);
                sink.emit(&AppEvent::PublishFailed(e));
                Err(e)
            }
        }
    }
}
