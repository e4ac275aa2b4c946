//! Mock port adapters for integration tests.
//!
//! Record every call so tests can assert on the full render and publish
//! history without a screen or a broker.

use drivemode::app::events::AppEvent;
use drivemode::app::ports::{EventSink, RenderSink, TransportPort};
use drivemode::error::TransportError;
use drivemode::mode::{DriverState, Rgb};

// ── Render call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Indicator(DriverState),
    Show { text: String, colour: Rgb },
    Hide,
}

// ── RecordingRender ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingRender {
    pub calls: Vec<RenderCall>,
}

#[allow(dead_code)]
impl RecordingRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colours of every alert frame drawn, in order.
    pub fn frames(&self) -> Vec<Rgb> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Show { colour, .. } => Some(*colour),
                _ => None,
            })
            .collect()
    }

    pub fn hides(&self) -> usize {
        self.calls.iter().filter(|c| **c == RenderCall::Hide).count()
    }

    pub fn last_indicator(&self) -> Option<DriverState> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::Indicator(s) => Some(*s),
            _ => None,
        })
    }

    /// Whether alert text is currently on screen.
    pub fn alert_visible(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                RenderCall::Show { .. } => Some(true),
                RenderCall::Hide => Some(false),
                RenderCall::Indicator(_) => None,
            })
            .unwrap_or(false)
    }
}

impl RenderSink for RecordingRender {
    fn set_indicator(&mut self, state: DriverState) {
        self.calls.push(RenderCall::Indicator(state));
    }

    fn show_alert_text(&mut self, text: &str, colour: Rgb) {
        self.calls.push(RenderCall::Show {
            text: text.to_string(),
            colour,
        });
    }

    fn hide_alert_text(&mut self) {
        self.calls.push(RenderCall::Hide);
    }
}

// ── RecordingTransport ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Vec<(String, Vec<u8>)>,
    /// Errors returned by the next publishes, front first.
    pub failures: Vec<TransportError>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_once(err: TransportError) -> Self {
        Self {
            sent: Vec::new(),
            failures: vec![err],
        }
    }

    pub fn payload_json(&self, idx: usize) -> serde_json::Value {
        serde_json::from_slice(&self.sent[idx].1).expect("payload is JSON")
    }
}

impl TransportPort for RecordingTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.failures.is_empty() {
            return Err(self.failures.remove(0));
        }
        self.sent.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }
}

// ── VecSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
