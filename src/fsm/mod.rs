//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, event-driven:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────┬───────────┬──────────┬──────────────────────┐  │
//! │  │ StateId  │ on_enter  │ on_exit  │ on_update            │  │
//! │  ├──────────┼───────────┼──────────┼──────────────────────┤  │
//! │  │ Idle     │ fn(ctx)   │   :     │ fn(ctx, s)->Option<> │  │
//! │  │ Alerting │ fn(ctx)   │ fn(ctx)  │ fn(ctx, s)->Option<> │  │
//! │  └──────────┴───────────┴──────────┴──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each [`Stimulus`] (a decoded state or a blink tick) is handed to the
//! **current** state's `on_update`.  If it returns `Some(next_id)`, the
//! engine runs `on_exit` for the current state, then `on_enter` for the
//! next, and updates the current pointer.

pub mod context;
pub mod session;
pub mod states;

use context::DisplayContext;
use log::info;
use session::CancelToken;

use crate::mode::DriverState;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all display states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// No active alert.
    Idle = 0,
    /// Blink session live.
    Alerting = 1,
}

impl StateId {
    /// Total number of states.  Sizes the table array.
    pub const COUNT: usize = 2;

    /// Convert an index back to `StateId`.  Out-of-range indices assert in
    /// debug builds and fall back to `Idle`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Alerting,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

/// Input to a state's update handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    /// A decoded notification.
    Mode(DriverState),
    /// A blink deadline fired for the chain identified by the token.
    Tick(CancelToken),
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut DisplayContext);

/// Signature for the per-stimulus update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut DisplayContext, Stimulus) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Stimuli dispatched since start.
    dispatched: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            dispatched: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `dispatch()`.
    pub fn start(&mut self, ctx: &mut DisplayContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Hand one stimulus to the current state and apply any transition.
    pub fn dispatch(&mut self, stimulus: Stimulus, ctx: &mut DisplayContext) {
        self.dispatched += 1;
        let next = (self.table[self.current].on_update)(ctx, stimulus);
        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Number of stimuli dispatched since start.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut DisplayContext) {
        let next_idx = next_id as usize;
        if next_idx == self.current {
            return;
        }

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
