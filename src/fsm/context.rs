//! Shared mutable context threaded through every FSM handler.
//!
//! `AlarmContext` is the single struct that state handlers read from and
//! write to.  It holds the per-tick input snapshot, derived sensor
//! readings, the latched trigger flags, the blink timer, output commands,
//! the code validator and configuration.  Nothing in the firmware lives in
//! a global; the application service owns exactly one of these.

use crate::access::CodeValidator;
use crate::config::{AlarmConfig, CODE_LENGTH};

// ---------------------------------------------------------------------------
// Input snapshot (captured once per tick, read-only afterwards)
// ---------------------------------------------------------------------------

/// Raw digital inputs sampled at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub enter: bool,
    pub test: bool,
    pub a: bool,
    pub b: bool,
    pub c: bool,
    pub d: bool,
    /// Raw level of the MQ-2 digital output (active-low).
    pub gas_line_active: bool,
}

impl InputSnapshot {
    /// The four code buttons in entry order.
    pub fn keys(&self) -> [bool; CODE_LENGTH] {
        [self.a, self.b, self.c, self.d]
    }

    pub fn all_keys_pressed(&self) -> bool {
        self.a && self.b && self.c && self.d
    }
}

// ---------------------------------------------------------------------------
// Sensor readings (written by the sampler before the FSM tick)
// ---------------------------------------------------------------------------

/// Conditions derived from the raw inputs this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReadings {
    /// Rolling-average temperature (°C).
    pub temp_c: f32,
    /// `temp_c` is above the configured limit.
    pub over_temp: bool,
    /// MQ-2 line reads inactive.
    pub gas_detected: bool,
}

// ---------------------------------------------------------------------------
// Latched triggers
// ---------------------------------------------------------------------------

/// Which conditions have fired during the current alarm cycle.
/// Cleared only when the alarm returns to Disarmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latches {
    pub gas: bool,
    pub over_temp: bool,
}

impl Latches {
    pub fn any(&self) -> bool {
        self.gas || self.over_temp
    }
}

// ---------------------------------------------------------------------------
// Output commands (written by handlers; applied by the service each tick)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCommands {
    pub alarm_led: bool,
    pub incorrect_led: bool,
    pub lockout_led: bool,
    /// `true` = siren line pulled low; `false` = released (high-Z).
    pub siren_driven: bool,
}

impl OutputCommands {
    /// Everything off, siren released.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// AlarmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct AlarmContext {
    // -- Timing --
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Milliseconds credited to the blink timer per tick.
    pub tick_period_ms: u32,

    // -- Inputs --
    pub inputs: InputSnapshot,
    pub sensors: SensorReadings,

    // -- Alarm cycle --
    pub latches: Latches,
    /// Milliseconds accumulated since the last alarm LED toggle.
    pub blink_elapsed_ms: u32,

    // -- Outputs --
    pub commands: OutputCommands,

    // -- Code entry --
    pub access: CodeValidator,

    // -- Configuration --
    pub config: AlarmConfig,
}

impl AlarmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            total_ticks: 0,
            tick_period_ms: config.tick_period_ms,
            inputs: InputSnapshot::default(),
            sensors: SensorReadings::default(),
            latches: Latches::default(),
            blink_elapsed_ms: 0,
            commands: OutputCommands::all_off(),
            access: CodeValidator::new(&config),
            config,
        }
    }

    /// True if any arming condition is present right now.
    pub fn trigger_present(&self) -> bool {
        self.sensors.gas_detected || self.sensors.over_temp || self.inputs.test
    }

    /// OR the current conditions into the cycle latches.  The test button
    /// counts as both.
    pub fn latch_triggers(&mut self) {
        if self.sensors.gas_detected || self.inputs.test {
            self.latches.gas = true;
        }
        if self.sensors.over_temp || self.inputs.test {
            self.latches.over_temp = true;
        }
    }

    /// Blink period for the current latch combination, or `None` when
    /// nothing is latched.
    pub fn blink_cadence_ms(&self) -> Option<u32> {
        match (self.latches.gas, self.latches.over_temp) {
            (true, true) => Some(self.config.blink_gas_and_over_temp_ms),
            (true, false) => Some(self.config.blink_gas_ms),
            (false, true) => Some(self.config.blink_over_temp_ms),
            (false, false) => None,
        }
    }
}
