//! Log-based render adapter.
//!
//! Implements [`RenderSink`] by writing each draw call to the logger.
//! Stands in for a graphical cluster when running headless; a real
//! display toolkit would implement the same trait.

use log::info;

use crate::app::ports::RenderSink;
use crate::mode::{DriverState, Rgb};

/// Headless render surface.  Tracks what is "on screen" so repeated
/// hides stay silent.
#[derive(Debug, Default)]
pub struct LogRender {
    indicator: Option<DriverState>,
    alert_visible: bool,
}

impl LogRender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indicator(&self) -> Option<DriverState> {
        self.indicator
    }

    pub fn alert_visible(&self) -> bool {
        self.alert_visible
    }
}

impl RenderSink for LogRender {
    fn set_indicator(&mut self, state: DriverState) {
        self.indicator = Some(state);
        info!("DRAW  | indicator={}", state);
    }

    fn show_alert_text(&mut self, text: &str, colour: Rgb) {
        self.alert_visible = true;
        let (r, g, b) = colour;
        info!("DRAW  | alert \"{}\" #{:02x}{:02x}{:02x}", text, r, g, b);
    }

    fn hide_alert_text(&mut self) {
        if self.alert_visible {
            self.alert_visible = false;
            info!("DRAW  | alert hidden");
        }
    }
}
