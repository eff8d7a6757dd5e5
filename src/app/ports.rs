//! Port traits: the hexagonal boundary between alarm logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! The alarm logic is total and assumes hardware access succeeds, so every
//! port is infallible.  Adapters that sit on fallible HAL calls log the
//! failure and return the last good value instead.

use crate::fsm::context::InputSnapshot;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Digital inputs: the six buttons and the gas detector line.
pub trait InputPort {
    /// Sample every digital input once.
    fn read_inputs(&mut self) -> InputSnapshot;
}

/// Analog inputs, normalised to 0.0–1.0 of VREF.
pub trait AnalogPort {
    /// LM35 temperature sensor.
    fn read_temperature_raw(&mut self) -> f32;

    /// Front-panel potentiometer (read on demand by the console).
    fn read_potentiometer(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    fn set_alarm_led(&mut self, on: bool);

    fn set_incorrect_led(&mut self, on: bool);

    fn set_lockout_led(&mut self, on: bool);

    /// Pull the open-drain siren line low.
    fn drive_siren(&mut self);

    /// Return the siren line to high impedance.
    fn release_siren(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: domain ↔ console UART)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented console transport.
pub trait SerialPort {
    /// At least one byte can be read without blocking.
    fn readable(&mut self) -> bool;

    /// Read one byte if available; never blocks.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write every byte of `bytes`.
    fn write(&mut self, bytes: &[u8]);
}

/// Everything the service needs from the board in one bound.
pub trait BoardPort: InputPort + AnalogPort + ActuatorPort + SerialPort {}

impl<T: InputPort + AnalogPort + ActuatorPort + SerialPort> BoardPort for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
