//! Concrete state handler functions and table builder.
//!
//! ```text
//!            [gas | over-temp | test button]
//!  DISARMED ─────────────────────────────────▶ ARMED
//!     ▲                                          │
//!     └──────────[code accepted]─────────────────┘
//! ```
//!
//! The return edge is driven by the service via `force_transition`; the
//! Armed update handler never leaves on its own.

use super::context::AlarmContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Disarmed
        StateDescriptor {
            name: "Disarmed",
            on_enter: Some(disarmed_enter),
            on_exit: None,
            on_update: disarmed_update,
        },
        // Index 1: Armed
        StateDescriptor {
            name: "Armed",
            on_enter: Some(armed_enter),
            on_exit: Some(armed_exit),
            on_update: armed_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISARMED state
// ═══════════════════════════════════════════════════════════════════════════

fn disarmed_enter(ctx: &mut AlarmContext) {
    ctx.commands.alarm_led = false;
    ctx.commands.siren_driven = false;
    ctx.latches.gas = false;
    ctx.latches.over_temp = false;
    ctx.blink_elapsed_ms = 0;
    info!("DISARMED: siren released, monitoring");
}

fn disarmed_update(ctx: &mut AlarmContext) -> Option<StateId> {
    if ctx.trigger_present() {
        ctx.latch_triggers();
        return Some(StateId::Armed);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED state
// ═══════════════════════════════════════════════════════════════════════════

fn armed_enter(ctx: &mut AlarmContext) {
    ctx.commands.siren_driven = true;
    ctx.blink_elapsed_ms = 0;
    // The arming tick is the first armed tick.
    advance_blink(ctx);
    warn!(
        "ARMED: gas={} over_temp={} test={} T={:.1}\u{00b0}C",
        ctx.sensors.gas_detected, ctx.sensors.over_temp, ctx.inputs.test, ctx.sensors.temp_c
    );
}

fn armed_update(ctx: &mut AlarmContext) -> Option<StateId> {
    ctx.latch_triggers();
    ctx.commands.siren_driven = true;
    advance_blink(ctx);

    None
}

/// Credit one tick to the blink timer and toggle the alarm LED once the
/// cadence for the latched triggers has elapsed.
fn advance_blink(ctx: &mut AlarmContext) {
    ctx.blink_elapsed_ms = ctx.blink_elapsed_ms.saturating_add(ctx.tick_period_ms);
    if let Some(cadence) = ctx.blink_cadence_ms() {
        if ctx.blink_elapsed_ms >= cadence {
            ctx.blink_elapsed_ms = 0;
            ctx.commands.alarm_led = !ctx.commands.alarm_led;
        }
    }
}

fn armed_exit(ctx: &mut AlarmContext) {
    info!(
        "ARMED exit (latched gas={} over_temp={})",
        ctx.latches.gas, ctx.latches.over_temp
    );
}
