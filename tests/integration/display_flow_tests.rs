//! Integration tests for the payload → decoder → FSM → render pipeline.
//!
//! Drive a [`DisplayController`] with raw payloads and a synthetic clock,
//! then assert on the recorded render calls and emitted events.

use std::time::{Duration, Instant};

use drivemode::app::events::AppEvent;
use drivemode::app::service::DisplayController;
use drivemode::config::AlertConfig;
use drivemode::error::DecodeError;
use drivemode::fsm::StateId;
use drivemode::mode::DriverState;

use crate::mock_ports::{RecordingRender, RenderCall, VecSink};

const RED: (u8, u8, u8) = (255, 0, 0);
const BLACK: (u8, u8, u8) = (0, 0, 0);

struct Rig {
    ctl: DisplayController,
    render: RecordingRender,
    sink: VecSink,
    t0: Instant,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(AlertConfig::default())
    }

    fn with_config(config: AlertConfig) -> Self {
        let t0 = Instant::now();
        let mut ctl = DisplayController::new(config, t0);
        let mut render = RecordingRender::new();
        let mut sink = VecSink::new();
        ctl.start(&mut render, &mut sink);
        Self {
            ctl,
            render,
            sink,
            t0,
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    fn send(&mut self, payload: &[u8], ms: u64) {
        let now = self.at(ms);
        self.ctl
            .on_payload(payload, now, &mut self.render, &mut self.sink);
    }

    /// Fire the armed tick at `ms` (regardless of its scheduled time).
    fn tick(&mut self, ms: u64) {
        let (_, token) = self.ctl.next_deadline().expect("tick armed");
        let now = self.at(ms);
        self.ctl.on_tick(token, now, &mut self.render, &mut self.sink);
    }

    /// Fire armed ticks on schedule until none is armed.
    fn run_ticks(&mut self) {
        while let Some((at, token)) = self.ctl.next_deadline() {
            self.ctl.on_tick(token, at, &mut self.render, &mut self.sink);
        }
    }
}

// ── Mode handling ─────────────────────────────────────────────

#[test]
fn normal_keeps_idle_with_normal_indicator() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"normal"}"#, 0);
    assert_eq!(rig.ctl.state(), StateId::Idle);
    assert_eq!(rig.ctl.mode().indicator, DriverState::Normal);
    assert_eq!(rig.render.last_indicator(), Some(DriverState::Normal));
    assert!(!rig.render.alert_visible());
}

#[test]
fn restricted_while_idle_starts_session_at_processing_time() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 1234);
    assert_eq!(rig.ctl.state(), StateId::Alerting);
    assert_eq!(rig.ctl.mode().indicator, DriverState::Restricted);
    assert!(rig.ctl.mode().active);
    let session = rig.ctl.session().expect("session");
    assert_eq!(session.start_time, rig.at(1234));
    assert_eq!(session.text, AlertConfig::default().text);
    // First frame is drawn immediately in colour A.
    assert_eq!(rig.render.frames(), vec![RED]);
}

#[test]
fn mood_key_is_used_when_mode_is_absent() {
    let mut rig = Rig::new();
    rig.send(br#"{"mood":"restricted"}"#, 0);
    assert_eq!(rig.ctl.state(), StateId::Alerting);
}

#[test]
fn emotion_label_is_unknown_and_ignored() {
    let mut rig = Rig::new();
    let before = rig.ctl.mode();
    let calls = rig.render.calls.len();
    rig.send(br#"{"mood":"anger"}"#, 0);
    assert_eq!(rig.ctl.mode(), before);
    assert_eq!(rig.render.calls.len(), calls);
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::UnknownState));
}

#[test]
fn malformed_payloads_never_change_mode() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);
    let before = rig.ctl.mode();
    let token = rig.ctl.next_deadline().map(|(_, t)| t);

    let oversized = vec![b' '; 600];
    let bad: [&[u8]; 6] = [
        b"",
        b"not json",
        b"[1,2,3]",
        b"\"restricted\"",
        &[0xff, 0xfe, 0x00],
        oversized.as_slice(),
    ];
    for payload in bad {
        rig.send(payload, 100);
        assert_eq!(rig.ctl.mode(), before);
        assert_eq!(rig.ctl.next_deadline().map(|(_, t)| t), token);
    }
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::MessageDropped(_))),
        6
    );
    assert!(rig.sink.events.contains(&AppEvent::MessageDropped(DecodeError::TooLarge)));
    assert!(rig.sink.events.contains(&AppEvent::MessageDropped(DecodeError::NotUtf8)));
}

// ── Blink session ─────────────────────────────────────────────

#[test]
fn toggle_parity_follows_elapsed_half_seconds() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);
    rig.tick(500);
    rig.tick(1000);
    rig.tick(1500);
    assert_eq!(rig.render.frames(), vec![RED, BLACK, RED, BLACK]);
}

#[test]
fn late_tick_uses_elapsed_time_for_phase() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);
    // A tick delivered 1.2 s in is phase floor(2.4) % 2 = 0.
    rig.tick(1200);
    assert_eq!(rig.render.frames(), vec![RED, RED]);
    let (next, _) = rig.ctl.next_deadline().unwrap();
    assert_eq!(next, rig.at(1700));
}

#[test]
fn session_expires_at_thirty_seconds() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);

    rig.tick(29_999);
    assert_eq!(rig.ctl.state(), StateId::Alerting);

    rig.tick(30_000);
    assert_eq!(rig.ctl.state(), StateId::Idle);
    assert!(rig.ctl.session().is_none());
    assert!(!rig.render.alert_visible());
    assert_eq!(rig.ctl.mode().indicator, DriverState::Restricted);
    assert!(rig.ctl.next_deadline().is_none());
}

#[test]
fn scheduled_ticks_run_until_expiry() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);
    rig.run_ticks();
    let frames = rig.render.frames();
    assert_eq!(frames.len(), 60);
    assert!(frames.chunks(2).all(|pair| pair == [RED, BLACK]));
    assert_eq!(rig.render.calls.last(), Some(&RenderCall::Hide));
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::AlertExpired { elapsed_ms: 30_000 })
    );
}

#[test]
fn normal_inside_window_cancels_and_hides() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);
    rig.tick(500);
    let (_, stale) = rig.ctl.next_deadline().unwrap();
    rig.send(br#"{"mode":"normal"}"#, 800);

    assert_eq!(rig.ctl.state(), StateId::Idle);
    assert_eq!(rig.ctl.mode().indicator, DriverState::Normal);
    assert!(!rig.render.alert_visible());
    assert_eq!(rig.render.hides(), 1);

    // The old chain's tick no longer draws anything.
    let calls = rig.render.calls.len();
    let now = rig.at(1000);
    rig.ctl.on_tick(stale, now, &mut rig.render, &mut rig.sink);
    assert_eq!(rig.render.calls.len(), calls);
}

#[test]
fn duplicate_restricted_keeps_original_window() {
    let mut rig = Rig::new();
    rig.send(br#"{"mode":"restricted"}"#, 0);
    rig.send(br#"{"mode":"restricted"}"#, 20_000);
    assert_eq!(rig.ctl.session().unwrap().start_time, rig.at(0));
    rig.tick(30_000);
    assert_eq!(rig.ctl.state(), StateId::Idle);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlertStarted), 1);
}

#[test]
fn rearm_extends_window_when_enabled() {
    let mut rig = Rig::with_config(AlertConfig {
        rearm_on_restricted: true,
        ..AlertConfig::default()
    });
    rig.send(br#"{"mode":"restricted"}"#, 0);
    rig.send(br#"{"mode":"restricted"}"#, 20_000);
    assert_eq!(rig.ctl.session().unwrap().start_time, rig.at(20_000));
    rig.tick(30_000);
    assert_eq!(rig.ctl.state(), StateId::Alerting);
    rig.tick(50_000);
    assert_eq!(rig.ctl.state(), StateId::Idle);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlertStarted), 2);
}

#[test]
fn at_most_one_session_across_rapid_toggles() {
    let mut rig = Rig::new();
    for i in 0..10u64 {
        rig.send(br#"{"mode":"restricted"}"#, i * 100);
        rig.send(br#"{"mode":"normal"}"#, i * 100 + 50);
    }
    assert_eq!(rig.ctl.state(), StateId::Idle);
    assert!(rig.ctl.session().is_none());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlertStarted), 10);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::AlertCancelled { .. })),
        10
    );
}
