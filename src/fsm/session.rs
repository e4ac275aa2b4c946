//! Blink session bookkeeping.
//!
//! A session is one alert episode.  It carries its own periodic deadline
//! and a [`CancelToken`]; the display loop sleeps until the deadline and
//! hands the token back with the tick.  A tick whose token no longer
//! matches the live session is stale and is ignored, which is how a
//! cancelled or superseded session stops its timer chain.

use std::time::{Duration, Instant};

/// Generation number identifying one armed blink chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(u32);

impl CancelToken {
    pub const fn generation(self) -> u32 {
        self.0
    }
}

/// Hands out strictly increasing tokens.
#[derive(Debug, Default)]
pub struct TokenSource {
    next: u32,
}

impl TokenSource {
    pub fn issue(&mut self) -> CancelToken {
        let token = CancelToken(self.next);
        self.next = self.next.wrapping_add(1);
        token
    }
}

/// One ongoing alert episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlinkSession {
    pub text: String,
    pub start_time: Instant,
    pub token: CancelToken,
    /// When the next blink frame is due.
    pub next_tick: Instant,
}

impl BlinkSession {
    pub fn new(text: &str, now: Instant, token: CancelToken) -> Self {
        Self {
            text: text.to_string(),
            start_time: now,
            token,
            next_tick: now,
        }
    }

    /// Time since the session started.  Saturates at zero for clocks that
    /// appear to run backwards.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start_time)
    }

    /// True once `elapsed` has reached `duration`.
    pub fn is_expired(&self, now: Instant, duration: Duration) -> bool {
        self.elapsed(now) >= duration
    }

    /// Restart the window from `now` under a fresh token.
    pub fn rearm(&mut self, now: Instant, token: CancelToken) {
        self.start_time = now;
        self.token = token;
        self.next_tick = now;
    }
}

/// Blink phase for an elapsed time: `floor(elapsed / period) mod 2`.
///
/// With the default 500 ms period this is `floor(elapsed_secs * 2) mod 2`,
/// i.e. two toggles per second.
pub fn blink_phase(elapsed: Duration, period: Duration) -> u8 {
    let period_ms = period.as_millis().max(1);
    ((elapsed.as_millis() / period_ms) % 2) as u8
}
