//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers with no closures and no
//! captured state.  Everything a handler needs lives in [`DisplayContext`].
//!
//! ```text
//!  IDLE ──[restricted]──▶ ALERTING ──[restricted]──▶ (stays; re-arms if configured)
//!   ▲ ▲                    │    │
//!   │ └────[normal]────────┘    │
//!   └──────[elapsed ≥ duration]─┘
//!
//!  unknown / stale tick: no transition in either state
//! ```

use log::{debug, info};

use super::context::{AlertCommand, AlertOutcome, DisplayContext};
use super::session::{BlinkSession, blink_phase};
use super::{StateDescriptor, StateId, Stimulus};
use crate::mode::DriverState;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Alerting
        StateDescriptor {
            id: StateId::Alerting,
            name: "Alerting",
            on_enter: Some(alerting_enter),
            on_exit: Some(alerting_exit),
            on_update: alerting_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut DisplayContext) {
    debug_assert!(ctx.session.is_none());
    ctx.mode.active = false;
    info!("IDLE: indicator={}", ctx.mode.indicator);
}

fn idle_update(ctx: &mut DisplayContext, stimulus: Stimulus) -> Option<StateId> {
    match stimulus {
        Stimulus::Mode(DriverState::Normal) => {
            ctx.set_indicator(DriverState::Normal);
            None
        }
        Stimulus::Mode(DriverState::Restricted) => {
            ctx.set_indicator(DriverState::Restricted);
            Some(StateId::Alerting)
        }
        Stimulus::Mode(DriverState::Unknown) => None,
        Stimulus::Tick(token) => {
            debug!("IDLE: stale blink tick (gen {})", token.generation());
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERTING state (blink session live)
// ═══════════════════════════════════════════════════════════════════════════

fn alerting_enter(ctx: &mut DisplayContext) {
    let token = ctx.issue_token();
    ctx.session = Some(BlinkSession::new(&ctx.config.text, ctx.now, token));
    ctx.mode.active = true;
    info!(
        "ALERTING: blink session {} started for {}ms",
        token.generation(),
        ctx.config.duration_ms
    );
    render_frame(ctx);
}

fn alerting_exit(ctx: &mut DisplayContext) {
    ctx.session = None;
    ctx.mode.active = false;
    ctx.render.alert = AlertCommand::Hide;
}

fn alerting_update(ctx: &mut DisplayContext, stimulus: Stimulus) -> Option<StateId> {
    match stimulus {
        Stimulus::Mode(DriverState::Normal) => {
            let elapsed_ms = ctx.session_elapsed_ms();
            ctx.set_indicator(DriverState::Normal);
            ctx.outcome = Some(AlertOutcome::Cancelled { elapsed_ms });
            info!("ALERTING: cancelled by normal after {}ms", elapsed_ms);
            Some(StateId::Idle)
        }
        Stimulus::Mode(DriverState::Restricted) => {
            ctx.set_indicator(DriverState::Restricted);
            if ctx.config.rearm_on_restricted {
                let token = ctx.issue_token();
                let now = ctx.now;
                if let Some(session) = ctx.session.as_mut() {
                    session.rearm(now, token);
                }
                info!("ALERTING: re-armed (gen {})", token.generation());
                render_frame(ctx);
            }
            None
        }
        Stimulus::Mode(DriverState::Unknown) => None,
        Stimulus::Tick(token) => {
            let live = ctx.session.as_ref().is_some_and(|s| s.token == token);
            if !live {
                debug!("ALERTING: stale blink tick (gen {})", token.generation());
                return None;
            }
            let duration = ctx.alert_duration();
            let expired = ctx
                .session
                .as_ref()
                .is_some_and(|s| s.is_expired(ctx.now, duration));
            if expired {
                let elapsed_ms = ctx.session_elapsed_ms();
                ctx.outcome = Some(AlertOutcome::Expired { elapsed_ms });
                info!("ALERTING: expired after {}ms", elapsed_ms);
                return Some(StateId::Idle);
            }
            render_frame(ctx);
            None
        }
    }
}

/// Queue the frame for the current phase and arm the next tick.
fn render_frame(ctx: &mut DisplayContext) {
    let period = ctx.blink_period();
    let now = ctx.now;
    let Some(session) = ctx.session.as_mut() else {
        return;
    };
    let colour = if blink_phase(session.elapsed(now), period) == 0 {
        ctx.config.colour_on
    } else {
        ctx.config.colour_off
    };
    session.next_tick = now + period;
    ctx.render.alert = AlertCommand::Show(colour);
}
