//! System configuration parameters
//!
//! All tunable parameters for the alarm.  There is no persistence: the
//! device always boots with [`AlarmConfig::default()`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of digits in a disarm code (the A, B, C and D buttons).
pub const CODE_LENGTH: usize = 4;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmConfig {
    // --- Temperature ---
    /// Averaged temperature (Celsius) above which the alarm arms
    pub over_temp_level_c: f32,
    /// ADC reference voltage
    pub vref_volts: f32,
    /// LM35 scale factor (volts per degree Celsius)
    pub volts_per_degree: f32,

    // --- Blink cadence (milliseconds between alarm LED toggles) ---
    /// Gas only
    pub blink_gas_ms: u32,
    /// Over-temperature only
    pub blink_over_temp_ms: u32,
    /// Gas and over-temperature together
    pub blink_gas_and_over_temp_ms: u32,

    // --- Code entry ---
    /// Code loaded at boot
    pub default_code: [bool; CODE_LENGTH],
    /// Consecutive failed attempts that lock out button entry
    pub lockout_threshold: u8,
    /// Abandon a serial code entry after this long; `None` waits forever
    pub code_entry_timeout_ms: Option<u32>,

    // --- Timing ---
    /// Main loop delay (milliseconds)
    pub tick_period_ms: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            // Temperature
            over_temp_level_c: 50.0,
            vref_volts: 3.3,
            volts_per_degree: 0.01,

            // Blink cadence
            blink_gas_ms: 1000,
            blink_over_temp_ms: 500,
            blink_gas_and_over_temp_ms: 100,

            // Code entry
            default_code: [true, true, false, false],
            lockout_threshold: 5,
            code_entry_timeout_ms: None,

            // Timing
            tick_period_ms: 10,
        }
    }
}

impl AlarmConfig {
    /// Multiplier from a normalised analog reading to degrees Celsius.
    pub fn celsius_per_unit(&self) -> f32 {
        self.vref_volts / self.volts_per_degree
    }

    /// Reject values the control loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick period must be non-zero"));
        }
        if self.volts_per_degree <= 0.0 || self.vref_volts <= 0.0 {
            return Err(Error::Config("analog scale must be positive"));
        }
        if self.blink_gas_ms == 0 || self.blink_over_temp_ms == 0 || self.blink_gas_and_over_temp_ms == 0 {
            return Err(Error::Config("blink cadence must be non-zero"));
        }
        if self.lockout_threshold == 0 {
            return Err(Error::Config("lockout threshold must be non-zero"));
        }
        if self.code_entry_timeout_ms == Some(0) {
            return Err(Error::Config("code entry timeout must be non-zero"));
        }
        Ok(())
    }
}
