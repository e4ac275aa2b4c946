//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger as tagged one-line records.  A metrics or telemetry adapter
//! would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::IndicatorChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::AlertStarted => {
                info!("ALERT | started");
            }
            AppEvent::AlertExpired { elapsed_ms } => {
                info!("ALERT | expired after {}ms", elapsed_ms);
            }
            AppEvent::AlertCancelled { elapsed_ms } => {
                info!("ALERT | cancelled after {}ms", elapsed_ms);
            }
            AppEvent::MessageDropped(e) => {
                warn!("DROP  | {}", e);
            }
            AppEvent::UnknownState => {
                info!("DROP  | unrecognised state");
            }
            AppEvent::Published { state } => {
                info!("PUB   | {}", state);
            }
            AppEvent::PublishFailed(e) => {
                warn!("PUB   | failed: {}", e);
            }
        }
    }
}
