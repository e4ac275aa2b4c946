//! Drive-mode classifier.
//!
//! Collects mood and heart-rate samples into bounded windows and, once per
//! analysis interval, folds them into a single [`DriveDecision`].  The
//! decision is published through the
//! [`StatePublisher`](crate::app::publisher::StatePublisher) like any other
//! detector label.
//!
//! ```text
//!  driver/mood ───────▶ ┌─────────────┐
//!                       │  windows    │──analyze()──▶ DriveDecision
//!  driver/heart_rate ──▶ └─────────────┘   (clears)
//! ```
//!
//! Mood takes priority: `sad` restricts, `happy`/`neutral` allow normal.
//! Only when the mood window is empty does heart rate decide.

use core::fmt;

use heapless::Deque;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::{ClassifierConfig, TopicConfig};
use crate::error::DecodeError;
use crate::mode::DriverState;

/// Samples kept per window.  The oldest sample is evicted when full.
pub const WINDOW_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MoodSample {
    mood: String,
}

#[derive(Debug, Deserialize)]
struct HeartRateSample {
    heart_rate: u32,
}

/// Face-model emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Sad,
    Happy,
    Neutral,
    Angry,
    /// Any other label; counted in the window total only.
    Other,
}

impl Mood {
    pub fn from_label(label: &str) -> Self {
        match label {
            "sad" => Self::Sad,
            "happy" => Self::Happy,
            "neutral" => Self::Neutral,
            "angry" => Self::Angry,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Sad,
    Happy,
    Neutral,
    Unknown,
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sad => "sad",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heartbeat {
    High,
    Nominal,
    Unknown,
}

impl fmt::Display for Heartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Nominal => "nominal",
            Self::Unknown => "unknown",
        })
    }
}

/// Outcome of one analysis interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveDecision {
    pub state: DriverState,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Pure analysis
// ---------------------------------------------------------------------------

/// Reduce a mood window to one emotion.
pub fn analyze_mood(moods: impl IntoIterator<Item = Mood>) -> Emotion {
    let (mut sad, mut happy, mut neutral, mut angry, mut total) = (0u32, 0u32, 0u32, 0u32, 0u32);
    for mood in moods {
        total += 1;
        match mood {
            Mood::Sad => sad += 1,
            Mood::Happy => happy += 1,
            Mood::Neutral => neutral += 1,
            Mood::Angry => angry += 1,
            Mood::Other => {}
        }
    }
    if total == 0 {
        return Emotion::Unknown;
    }
    debug!(
        "mood window: sad={} happy={} neutral={} angry={} of {}",
        sad, happy, neutral, angry, total
    );
    // Shares of the same total compare like raw counts.
    if sad + angry >= happy && sad >= neutral {
        Emotion::Sad
    } else if happy >= neutral {
        Emotion::Happy
    } else {
        Emotion::Neutral
    }
}

/// Direction from the first to the last reading.
pub fn trend(readings: &[u32]) -> Trend {
    match (readings.first(), readings.last()) {
        (Some(first), Some(last)) if last > first => Trend::Rising,
        (Some(first), Some(last)) if last < first => Trend::Falling,
        _ => Trend::Stable,
    }
}

/// Reduce a heart-rate window to one classification.
pub fn analyze_heart_rate(readings: &[u32], elevated_bpm: u32) -> Heartbeat {
    match readings.len() {
        0 => return Heartbeat::Unknown,
        1 => return Heartbeat::Nominal,
        _ => {}
    }
    let elevated = readings.iter().filter(|&&bpm| bpm > elevated_bpm).count();
    let mostly_elevated = elevated * 2 > readings.len();
    let direction = trend(readings);
    debug!(
        "heart-rate window: {} readings, {} elevated, trend {:?}",
        readings.len(),
        elevated,
        direction
    );
    match direction {
        Trend::Falling => Heartbeat::Nominal,
        Trend::Rising | Trend::Stable if mostly_elevated => Heartbeat::High,
        Trend::Rising | Trend::Stable => Heartbeat::Nominal,
    }
}

/// Combine both analyses.  Emotion has priority over heart rate.
pub fn decide(emotion: Emotion, heartbeat: Heartbeat) -> DriveDecision {
    let state = match (emotion, heartbeat) {
        (Emotion::Sad, _) => DriverState::Restricted,
        (Emotion::Happy | Emotion::Neutral, _) => DriverState::Normal,
        (Emotion::Unknown, Heartbeat::High) => DriverState::Restricted,
        (Emotion::Unknown, _) => DriverState::Normal,
    };
    DriveDecision {
        state,
        reason: format!("Emotion: {}, Heartbeat: {}", emotion, heartbeat),
    }
}

// ---------------------------------------------------------------------------
// Windowed classifier
// ---------------------------------------------------------------------------

/// Accumulates samples between analysis intervals.
pub struct DriveModeClassifier {
    mood_topic: String,
    heart_rate_topic: String,
    elevated_bpm: u32,
    moods: Deque<Mood, WINDOW_CAPACITY>,
    heart_rates: Deque<u32, WINDOW_CAPACITY>,
}

impl DriveModeClassifier {
    pub fn new(topics: &TopicConfig, config: &ClassifierConfig) -> Self {
        Self {
            mood_topic: topics.mood.clone(),
            heart_rate_topic: topics.heart_rate.clone(),
            elevated_bpm: config.elevated_heart_rate_bpm,
            moods: Deque::new(),
            heart_rates: Deque::new(),
        }
    }

    /// Topics this classifier consumes.
    pub fn topics(&self) -> [&str; 2] {
        [&self.mood_topic, &self.heart_rate_topic]
    }

    /// Route one inbound message by topic.  Malformed payloads and foreign
    /// topics are logged and dropped.
    pub fn on_message(&mut self, topic: &str, payload: &[u8]) {
        let result = if topic == self.mood_topic {
            self.record_mood(payload)
        } else if topic == self.heart_rate_topic {
            self.record_heart_rate(payload)
        } else {
            warn!("Ignoring message on unexpected topic {}", topic);
            return;
        };
        if let Err(e) = result {
            warn!("Dropping sample on {}: {}", topic, e);
        }
    }

    /// Parse and store a `{"mood": "<label>"}` sample.
    pub fn record_mood(&mut self, payload: &[u8]) -> Result<(), DecodeError> {
        let sample: MoodSample = parse(payload)?;
        let mood = Mood::from_label(&sample.mood);
        push_evicting(&mut self.moods, mood);
        debug!("mood sample {:?} ({} in window)", mood, self.moods.len());
        Ok(())
    }

    /// Parse and store a `{"heart_rate": <bpm>}` sample.
    pub fn record_heart_rate(&mut self, payload: &[u8]) -> Result<(), DecodeError> {
        let sample: HeartRateSample = parse(payload)?;
        push_evicting(&mut self.heart_rates, sample.heart_rate);
        debug!(
            "heart-rate sample {} bpm ({} in window)",
            sample.heart_rate,
            self.heart_rates.len()
        );
        Ok(())
    }

    /// Number of buffered (mood, heart-rate) samples.
    pub fn pending(&self) -> (usize, usize) {
        (self.moods.len(), self.heart_rates.len())
    }

    /// Fold the windows into a decision and clear them.  `None` when no
    /// sample arrived during the interval.
    pub fn analyze(&mut self) -> Option<DriveDecision> {
        let (moods, rates) = self.pending();
        if moods == 0 && rates == 0 {
            info!("No samples collected in this interval");
            return None;
        }

        let emotion = analyze_mood(self.moods.iter().copied());
        let readings: heapless::Vec<u32, WINDOW_CAPACITY> =
            self.heart_rates.iter().copied().collect();
        let heartbeat = analyze_heart_rate(&readings, self.elevated_bpm);
        let decision = decide(emotion, heartbeat);

        info!(
            "Analysed {} mood / {} heart-rate samples: {} ({})",
            moods, rates, decision.state, decision.reason
        );
        self.moods.clear();
        self.heart_rates.clear();
        Some(decision)
    }
}

fn parse<'a, T: Deserialize<'a>>(payload: &'a [u8]) -> Result<T, DecodeError> {
    let text = core::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;
    serde_json::from_str(text).map_err(|_| DecodeError::MalformedPayload)
}

fn push_evicting<T, const N: usize>(window: &mut Deque<T, N>, item: T) {
    if window.is_full() {
        window.pop_front();
    }
    // Cannot fail: a slot was freed above.
    let _ = window.push_back(item);
}
