//! Shared mutable context threaded through every FSM handler.
//!
//! `DisplayContext` is the single struct that state handlers read from and
//! write to: the processing timestamp, the authoritative [`DisplayMode`],
//! the live [`BlinkSession`], pending render commands and the alert
//! configuration.  Handlers never touch the render surface directly; the
//! controller applies [`RenderCommands`] after each dispatch.

use std::time::{Duration, Instant};

use crate::config::AlertConfig;
use crate::mode::{DriverState, Rgb};

use super::session::{BlinkSession, CancelToken, TokenSource};

// ---------------------------------------------------------------------------
// Display mode (authoritative, single writer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub indicator: DriverState,
    /// True while a blink session is live.
    pub active: bool,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            indicator: DriverState::Normal,
            active: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Render commands (written by state handlers; applied by the controller)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertCommand {
    /// Leave the alert text as it is.
    #[default]
    Keep,
    /// Draw the alert text in this colour.
    Show(Rgb),
    /// Remove the alert text.
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderCommands {
    /// Redraw the indicator with this state.
    pub indicator: Option<DriverState>,
    pub alert: AlertCommand,
}

/// How the last session ended, for event reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    Expired { elapsed_ms: u64 },
    Cancelled { elapsed_ms: u64 },
}

// ---------------------------------------------------------------------------
// DisplayContext
// ---------------------------------------------------------------------------

pub struct DisplayContext {
    /// Processing time of the stimulus being dispatched.
    pub now: Instant,
    pub mode: DisplayMode,
    pub session: Option<BlinkSession>,
    pub render: RenderCommands,
    pub config: AlertConfig,
    /// Set by handlers when a session ends; taken by the controller.
    pub outcome: Option<AlertOutcome>,
    tokens: TokenSource,
}

impl DisplayContext {
    pub fn new(config: AlertConfig, now: Instant) -> Self {
        Self {
            now,
            mode: DisplayMode::default(),
            session: None,
            render: RenderCommands::default(),
            config,
            outcome: None,
            tokens: TokenSource::default(),
        }
    }

    pub fn issue_token(&mut self) -> CancelToken {
        self.tokens.issue()
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.config.duration_ms))
    }

    pub fn blink_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.config.blink_period_ms))
    }

    /// Update the indicator and queue a redraw.
    pub fn set_indicator(&mut self, state: DriverState) {
        self.mode.indicator = state;
        self.render.indicator = Some(state);
    }

    /// Milliseconds the live session has been running (0 without one).
    pub fn session_elapsed_ms(&self) -> u64 {
        self.session
            .as_ref()
            .map_or(0, |s| s.elapsed(self.now).as_millis() as u64)
    }

    /// Drain pending render commands.
    pub fn take_render(&mut self) -> RenderCommands {
        core::mem::take(&mut self.render)
    }
}
