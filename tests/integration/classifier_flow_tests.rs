//! Integration tests for classifier decisions over realistic windows.

use drivemode::classifier::DriveModeClassifier;
use drivemode::config::{ClassifierConfig, TopicConfig};
use drivemode::mode::DriverState;

fn feed(c: &mut DriveModeClassifier, moods: &[&str], rates: &[u32]) {
    let topics = TopicConfig::default();
    for mood in moods {
        c.on_message(&topics.mood, format!(r#"{{"mood":"{mood}"}}"#).as_bytes());
    }
    for bpm in rates {
        c.on_message(&topics.heart_rate, format!(r#"{{"heart_rate":{bpm}}}"#).as_bytes());
    }
}

fn classifier() -> DriveModeClassifier {
    DriveModeClassifier::new(&TopicConfig::default(), &ClassifierConfig::default())
}

#[test]
fn happy_driver_with_racing_heart_stays_normal() {
    let mut c = classifier();
    feed(&mut c, &["happy", "happy", "neutral", "sad"], &[110, 120, 130]);
    let d = c.analyze().unwrap();
    assert_eq!(d.state, DriverState::Normal);
    assert_eq!(d.reason, "Emotion: happy, Heartbeat: high");
}

#[test]
fn angry_and_sad_majority_restricts() {
    let mut c = classifier();
    feed(&mut c, &["angry", "angry", "sad", "happy", "happy"], &[80, 82]);
    let d = c.analyze().unwrap();
    assert_eq!(d.state, DriverState::Restricted);
    assert_eq!(d.reason, "Emotion: sad, Heartbeat: nominal");
}

#[test]
fn falling_heart_rate_is_nominal_even_when_elevated() {
    let mut c = classifier();
    feed(&mut c, &[], &[140, 130, 120]);
    let d = c.analyze().unwrap();
    assert_eq!(d.state, DriverState::Normal);
    assert_eq!(d.reason, "Emotion: unknown, Heartbeat: nominal");
}

#[test]
fn custom_threshold_applies() {
    let config = ClassifierConfig {
        elevated_heart_rate_bpm: 80,
        ..ClassifierConfig::default()
    };
    let mut c = DriveModeClassifier::new(&TopicConfig::default(), &config);
    feed(&mut c, &[], &[85, 90]);
    assert_eq!(c.analyze().unwrap().state, DriverState::Restricted);
}

#[test]
fn windows_reset_between_intervals() {
    let mut c = classifier();
    feed(&mut c, &["sad"], &[]);
    assert_eq!(c.analyze().unwrap().state, DriverState::Restricted);
    feed(&mut c, &["happy"], &[]);
    assert_eq!(c.analyze().unwrap().state, DriverState::Normal);
    assert!(c.analyze().is_none());
}
