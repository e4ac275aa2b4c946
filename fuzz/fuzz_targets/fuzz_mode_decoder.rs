//! Fuzz target: `decoder::decode`
//!
//! Drives arbitrary byte sequences through the mode decoder and then into
//! a display controller, asserting that neither panics and that a rejected
//! payload never changes the display mode.
//!
//! cargo fuzz run fuzz_mode_decoder

#![no_main]

use std::time::Instant;

use drivemode::app::events::AppEvent;
use drivemode::app::ports::{EventSink, RenderSink};
use drivemode::app::service::DisplayController;
use drivemode::config::AlertConfig;
use drivemode::decoder::{self, MAX_PAYLOAD};
use drivemode::mode::{DriverState, Rgb};
use libfuzzer_sys::fuzz_target;

struct Null;

impl RenderSink for Null {
    fn set_indicator(&mut self, _state: DriverState) {}
    fn show_alert_text(&mut self, _text: &str, _colour: Rgb) {}
    fn hide_alert_text(&mut self) {}
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let decoded = decoder::decode(data);
    if data.len() > MAX_PAYLOAD {
        assert!(decoded.is_err(), "oversized payload must be rejected");
    }

    let now = Instant::now();
    let mut ctl = DisplayController::new(AlertConfig::default(), now);
    ctl.start(&mut Null, &mut Null);
    let before = ctl.mode();
    ctl.on_payload(data, now, &mut Null, &mut Null);
    if decoded.is_err() {
        assert_eq!(ctl.mode(), before, "rejected payload changed the display");
    }
});
