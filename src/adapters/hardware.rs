//! Hardware adapter: bridges board drivers to domain port traits.
//!
//! Owns the button bus, the indicator LEDs, the siren, an analog source
//! and the console transport, exposing them through [`InputPort`],
//! [`AnalogPort`], [`ActuatorPort`] and [`SerialPort`].  Generic over the
//! pin and transport types so the same adapter serves the ESP32-S3
//! board and the simulated one.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, AnalogPort, InputPort, SerialPort};
use crate::drivers::button_bus::ButtonBus;
use crate::drivers::indicator_leds::{Indicator, IndicatorLeds};
use crate::drivers::siren::Siren;
use crate::fsm::context::InputSnapshot;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<BP, GP, LP, SP, A, U> {
    buttons: ButtonBus<BP, GP>,
    leds: IndicatorLeds<LP>,
    siren: Siren<SP>,
    analog: A,
    serial: U,
}

impl<BP, GP, LP, SP, A, U> HardwareAdapter<BP, GP, LP, SP, A, U>
where
    BP: InputPin,
    GP: InputPin,
    LP: OutputPin,
    SP: OutputPin,
    A: AnalogPort,
    U: SerialPort,
{
    pub fn new(
        buttons: ButtonBus<BP, GP>,
        leds: IndicatorLeds<LP>,
        siren: Siren<SP>,
        analog: A,
        serial: U,
    ) -> Self {
        Self {
            buttons,
            leds,
            siren,
            analog,
            serial,
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<BP: InputPin, GP: InputPin, LP, SP, A, U> InputPort for HardwareAdapter<BP, GP, LP, SP, A, U> {
    fn read_inputs(&mut self) -> InputSnapshot {
        self.buttons.read()
    }
}

// ── AnalogPort implementation ─────────────────────────────────

impl<BP, GP, LP, SP, A: AnalogPort, U> AnalogPort for HardwareAdapter<BP, GP, LP, SP, A, U> {
    fn read_temperature_raw(&mut self) -> f32 {
        self.analog.read_temperature_raw()
    }

    fn read_potentiometer(&mut self) -> f32 {
        self.analog.read_potentiometer()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<BP, GP, LP: OutputPin, SP: OutputPin, A, U> ActuatorPort
    for HardwareAdapter<BP, GP, LP, SP, A, U>
{
    fn set_alarm_led(&mut self, on: bool) {
        self.leds.set(Indicator::Alarm, on);
    }

    fn set_incorrect_led(&mut self, on: bool) {
        self.leds.set(Indicator::Incorrect, on);
    }

    fn set_lockout_led(&mut self, on: bool) {
        self.leds.set(Indicator::Lockout, on);
    }

    fn drive_siren(&mut self) {
        self.siren.drive();
    }

    fn release_siren(&mut self) {
        self.siren.release();
    }
}

// ── SerialPort implementation ─────────────────────────────────

impl<BP, GP, LP, SP, A, U: SerialPort> SerialPort for HardwareAdapter<BP, GP, LP, SP, A, U> {
    fn readable(&mut self) -> bool {
        self.serial.readable()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.serial.read_byte()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.serial.write(bytes);
    }
}
