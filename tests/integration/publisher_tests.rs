//! Integration tests for the publisher → transport → decoder round trip.

use std::time::Instant;

use drivemode::app::events::AppEvent;
use drivemode::app::publisher::StatePublisher;
use drivemode::app::service::DisplayController;
use drivemode::config::{AlertConfig, TopicConfig};
use drivemode::error::TransportError;
use drivemode::fsm::StateId;
use drivemode::mode::DriverState;

use crate::mock_ports::{RecordingRender, RecordingTransport, VecSink};

fn publisher() -> StatePublisher {
    StatePublisher::new(TopicConfig::default().mode)
}

#[test]
fn each_report_publishes_exactly_once_on_mode_topic() {
    let p = publisher();
    let mut transport = RecordingTransport::new();
    let mut sink = VecSink::new();
    for label in ["normal", "restricted", "restricted", "happy"] {
        p.report(label, &mut transport, &mut sink).unwrap();
    }
    assert_eq!(transport.sent.len(), 4);
    assert!(transport.sent.iter().all(|(t, _)| t == "drive.mode/2/0/4/8001"));
    assert_eq!(transport.payload_json(3)["mode"], "unknown");
    assert_eq!(transport.payload_json(3)["mood"], "happy");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Published { .. })), 4);
}

#[test]
fn transport_failure_is_returned_and_reported() {
    let p = publisher();
    let mut transport = RecordingTransport::failing_once(TransportError::Connect);
    let mut sink = VecSink::new();
    assert_eq!(
        p.report("restricted", &mut transport, &mut sink),
        Err(TransportError::Connect)
    );
    assert_eq!(
        sink.events,
        vec![AppEvent::PublishFailed(TransportError::Connect)]
    );
    // Next call is unaffected.
    assert_eq!(
        p.report("restricted", &mut transport, &mut sink),
        Ok(DriverState::Restricted)
    );
    assert_eq!(transport.sent.len(), 1);
}

#[test]
fn published_payloads_drive_the_display() {
    let p = publisher();
    let mut transport = RecordingTransport::new();
    let mut sink = VecSink::new();
    p.report("restricted", &mut transport, &mut sink).unwrap();
    p.report("normal", &mut transport, &mut sink).unwrap();

    let t0 = Instant::now();
    let mut ctl = DisplayController::new(AlertConfig::default(), t0);
    let mut render = RecordingRender::new();
    ctl.start(&mut render, &mut sink);

    let (_, first) = &transport.sent[0];
    ctl.on_payload(first, t0, &mut render, &mut sink);
    assert_eq!(ctl.state(), StateId::Alerting);

    let (_, second) = &transport.sent[1];
    ctl.on_payload(second, t0, &mut render, &mut sink);
    assert_eq!(ctl.state(), StateId::Idle);
    assert_eq!(ctl.mode().indicator, DriverState::Normal);
}

#[test]
fn decided_state_carries_reason_without_mood() {
    let p = publisher();
    let mut transport = RecordingTransport::new();
    let mut sink = VecSink::new();
    p.publish_state(
        DriverState::Restricted,
        Some("Emotion: sad, Heartbeat: high".into()),
        &mut transport,
        &mut sink,
    )
    .unwrap();
    let json = transport.payload_json(0);
    assert_eq!(json["mode"], "restricted");
    assert_eq!(json["reason"], "Emotion: sad, Heartbeat: high");
    assert!(json.get("mood").is_none());
}
