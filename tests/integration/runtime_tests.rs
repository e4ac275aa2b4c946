//! Integration tests for the async loops with real reactor timers.
//!
//! Durations are scaled down so each test finishes in well under a
//! second.

use std::thread;
use std::time::{Duration, Instant};

use drivemode::app::events::AppEvent;
use drivemode::app::ports::MessageHandler;
use drivemode::app::publisher::StatePublisher;
use drivemode::app::service::DisplayController;
use drivemode::classifier::DriveModeClassifier;
use drivemode::config::{AlertConfig, ClassifierConfig, TopicConfig};
use drivemode::events::{Inbound, Inbox, InboxHandler};
use drivemode::fsm::StateId;
use drivemode::mode::DriverState;
use drivemode::runtime::{block_on, run_classifier, run_display};

use crate::mock_ports::{RecordingRender, RecordingTransport, VecSink};

const MODE_TOPIC: &str = "drive.mode/2/0/4/8001";

fn fast_alert() -> AlertConfig {
    AlertConfig {
        duration_ms: 200,
        blink_period_ms: 50,
        ..AlertConfig::default()
    }
}

#[test]
fn alert_blinks_then_expires_on_timers() {
    let inbox = Inbox::new();
    let mut ctl = DisplayController::new(fast_alert(), Instant::now());
    let mut render = RecordingRender::new();
    let mut sink = VecSink::new();
    ctl.start(&mut render, &mut sink);

    let mut handler = InboxHandler::new(&inbox);
    handler.on_message(MODE_TOPIC, br#"{"mode":"restricted"}"#);

    thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(400));
            block_on(inbox.send(Inbound::Shutdown));
        });
        block_on(run_display(&inbox, MODE_TOPIC, &mut ctl, &mut render, &mut sink));
    });

    assert_eq!(ctl.state(), StateId::Idle);
    assert_eq!(ctl.mode().indicator, DriverState::Restricted);
    assert!(!render.alert_visible());
    // 200 ms at 50 ms per frame: the initial frame plus at least a few toggles.
    assert!(render.frames().len() >= 3, "frames: {:?}", render.frames());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertExpired { .. })), 1);
}

#[test]
fn normal_cancels_running_blink_chain() {
    let inbox = Inbox::new();
    let mut ctl = DisplayController::new(AlertConfig::default(), Instant::now());
    let mut render = RecordingRender::new();
    let mut sink = VecSink::new();
    ctl.start(&mut render, &mut sink);

    thread::scope(|s| {
        s.spawn(|| {
            let mut handler = InboxHandler::new(&inbox);
            handler.on_message(MODE_TOPIC, br#"{"mode":"restricted"}"#);
            thread::sleep(Duration::from_millis(50));
            handler.on_message(MODE_TOPIC, br#"{"mode":"normal"}"#);
            thread::sleep(Duration::from_millis(50));
            handler.on_disconnect();
        });
        block_on(run_display(&inbox, MODE_TOPIC, &mut ctl, &mut render, &mut sink));
    });

    assert_eq!(ctl.state(), StateId::Idle);
    assert_eq!(ctl.mode().indicator, DriverState::Normal);
    assert!(ctl.next_deadline().is_none());
    assert_eq!(render.hides(), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertCancelled { .. })), 1);
}

#[test]
fn classifier_publishes_once_per_interval() {
    let inbox = Inbox::new();
    let topics = TopicConfig::default();
    let mut classifier = DriveModeClassifier::new(&topics, &ClassifierConfig::default());
    let publisher = StatePublisher::new(topics.mode.clone());
    let mut transport = RecordingTransport::new();
    let mut sink = VecSink::new();

    let mut handler = InboxHandler::new(&inbox);
    handler.on_message(&topics.mood, br#"{"mood":"sad"}"#);
    handler.on_message(&topics.heart_rate, br#"{"heart_rate":120}"#);

    thread::scope(|s| {
        s.spawn(|| {
            // Two intervals elapse; the second has no samples.
            thread::sleep(Duration::from_millis(250));
            block_on(inbox.send(Inbound::Shutdown));
        });
        block_on(run_classifier(
            &inbox,
            Duration::from_millis(100),
            &mut classifier,
            &publisher,
            &mut transport,
            &mut sink,
        ));
    });

    assert_eq!(transport.sent.len(), 1);
    let json = transport.payload_json(0);
    assert_eq!(json["mode"], "restricted");
    assert_eq!(json["reason"], "Emotion: sad, Heartbeat: nominal");
    assert_eq!(classifier.pending(), (0, 0));
}
