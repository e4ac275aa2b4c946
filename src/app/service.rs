//! Display controller: the hexagonal core of the display side.
//!
//! [`DisplayController`] owns the FSM and its shared context.  It exposes a
//! clean, transport-agnostic API: raw payloads and blink ticks go in,
//! render calls and [`AppEvent`]s come out.  All I/O flows through port
//! traits injected at call sites, so the whole controller is testable with
//! recording mocks and a synthetic clock.
//!
//! ```text
//!  payload ──▶ decode ──▶ ┌──────────────────────┐ ──▶ RenderSink
//!                         │  DisplayController   │
//!  tick(token) ─────────▶ │  FSM · BlinkSession  │ ──▶ EventSink
//!                         └──────────────────────┘
//! ```

use std::time::Instant;

use log::{debug, warn};

use crate::config::AlertConfig;
use crate::decoder;
use crate::fsm::context::{AlertCommand, AlertOutcome, DisplayContext, DisplayMode};
use crate::fsm::session::{BlinkSession, CancelToken};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId, Stimulus};
use crate::mode::DriverState;

use super::events::AppEvent;
use super::ports::{EventSink, RenderSink};

// ───────────────────────────────────────────────────────────────
// DisplayController
// ───────────────────────────────────────────────────────────────

/// Processes every stimulus for the display, one at a time.
pub struct DisplayController {
    fsm: Fsm,
    ctx: DisplayContext,
}

impl DisplayController {
    /// Construct the controller.  Does **not** start the FSM; call
    /// [`start`](Self::start) next.
    pub fn new(config: AlertConfig, now: Instant) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: DisplayContext::new(config, now),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state and draw the default indicator.
    pub fn start(&mut self, render: &mut impl RenderSink, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        render.set_indicator(self.ctx.mode.indicator);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
    }

    // ── Stimuli ───────────────────────────────────────────────

    /// Decode one inbound payload and apply it.  Malformed payloads and
    /// unrecognised labels are reported and otherwise ignored.
    pub fn on_payload(
        &mut self,
        payload: &[u8],
        now: Instant,
        render: &mut impl RenderSink,
        sink: &mut impl EventSink,
    ) {
        match decoder::decode(payload) {
            Ok(DriverState::Unknown) => {
                debug!("Ignoring notification with unrecognised state");
                sink.emit(&AppEvent::UnknownState);
            }
            Ok(state) => self.apply_state(state, now, render, sink),
            Err(e) => {
                warn!("Dropping inbound payload: {}", e);
                sink.emit(&AppEvent::MessageDropped(e));
            }
        }
    }

    /// Apply an already-decoded state.
    pub fn apply_state(
        &mut self,
        state: DriverState,
        now: Instant,
        render: &mut impl RenderSink,
        sink: &mut impl EventSink,
    ) {
        self.dispatch(Stimulus::Mode(state), now, render, sink);
    }

    /// A blink deadline fired for the chain identified by `token`.
    pub fn on_tick(
        &mut self,
        token: CancelToken,
        now: Instant,
        render: &mut impl RenderSink,
        sink: &mut impl EventSink,
    ) {
        self.dispatch(Stimulus::Tick(token), now, render, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// When the next blink tick is due, and the token it must carry.
    /// `None` while idle.
    pub fn next_deadline(&self) -> Option<(Instant, CancelToken)> {
        self.ctx.session.as_ref().map(|s| (s.next_tick, s.token))
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn mode(&self) -> DisplayMode {
        self.ctx.mode
    }

    pub fn session(&self) -> Option<&BlinkSession> {
        self.ctx.session.as_ref()
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch(
        &mut self,
        stimulus: Stimulus,
        now: Instant,
        render: &mut impl RenderSink,
        sink: &mut impl EventSink,
    ) {
        let prev_state = self.fsm.current_state();
        let prev_indicator = self.ctx.mode.indicator;
        let prev_token = self.ctx.session.as_ref().map(|s| s.token);

        self.ctx.now = now;
        self.fsm.dispatch(stimulus, &mut self.ctx);
        self.apply_render(render);

        let indicator = self.ctx.mode.indicator;
        if indicator != prev_indicator {
            sink.emit(&AppEvent::IndicatorChanged {
                from: prev_indicator,
                to: indicator,
            });
        }

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        if let Some(outcome) = self.ctx.outcome.take() {
            sink.emit(&match outcome {
                AlertOutcome::Expired { elapsed_ms } => AppEvent::AlertExpired { elapsed_ms },
                AlertOutcome::Cancelled { elapsed_ms } => AppEvent::AlertCancelled { elapsed_ms },
            });
        }

        let token = self.ctx.session.as_ref().map(|s| s.token);
        if token.is_some() && token != prev_token {
            sink.emit(&AppEvent::AlertStarted);
        }
    }

    /// Translate queued render commands into port calls.
    fn apply_render(&mut self, render: &mut impl RenderSink) {
        let cmds = self.ctx.take_render();
        if let Some(state) = cmds.indicator {
            render.set_indicator(state);
        }
        match cmds.alert {
            AlertCommand::Keep => {}
            AlertCommand::Show(colour) => render.show_alert_text(&self.ctx.config.text, colour),
            AlertCommand::Hide => render.hide_alert_text(),
        }
    }
}
