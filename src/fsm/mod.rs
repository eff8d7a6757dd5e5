//! Alarm state machine.
//!
//! A table of function pointers, one row per [`StateId`]:
//!
//! | State    | on_enter                         | on_update                 |
//! |----------|----------------------------------|---------------------------|
//! | Disarmed | release siren, clear latches     | arm on any trigger        |
//! | Armed    | drive siren, credit first tick   | latch triggers, blink LED |
//!
//! Only `Disarmed` leaves on its own.  The way back arrives from the code
//! validator through [`Fsm::force_transition`].

pub mod context;
pub mod states;

use context::AlarmContext;
use log::info;

/// The two alarm states.  Discriminants index the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Disarmed = 0,
    Armed = 1,
}

impl StateId {
    pub const COUNT: usize = 2;

    pub fn is_armed(self) -> bool {
        self == Self::Armed
    }
}

/// Runs on entering or leaving a state.
pub type StateActionFn = fn(&mut AlarmContext);

/// Per-tick handler.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut AlarmContext) -> Option<StateId>;

/// One row of the state table.
pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

/// Alarm state machine driven once per scheduler tick.
pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    current: StateId,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial,
        }
    }

    /// Run `on_enter` for the initial state.  Call once before the first tick.
    pub fn start(&mut self, ctx: &mut AlarmContext) {
        info!("FSM starting in state: {}", self.row(self.current).name);
        if let Some(enter) = self.row(self.current).on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick.
    pub fn tick(&mut self, ctx: &mut AlarmContext) {
        ctx.total_ticks += 1;
        if let Some(next) = (self.row(self.current).on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    /// Transition immediately, outside the update handler.  No-op if
    /// already in `next`.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut AlarmContext) {
        if next != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    fn row(&self, id: StateId) -> &StateDescriptor {
        &self.table[id as usize]
    }

    fn transition(&mut self, next: StateId, ctx: &mut AlarmContext) {
        info!(
            "FSM transition: {} -> {}",
            self.row(self.current).name,
            self.row(next).name
        );
        if let Some(exit) = self.row(self.current).on_exit {
            exit(ctx);
        }
        self.current = next;
        if let Some(enter) = self.row(next).on_enter {
            enter(ctx);
        }
    }
}
