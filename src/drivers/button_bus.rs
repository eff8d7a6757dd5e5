//! Six front-panel buttons plus the MQ-2 gas detector line.
//!
//! ## Hardware
//!
//! Buttons switch to 3.3 V against internal pull-downs, so a pressed
//! button reads high.  The MQ-2 module's DOUT is open-collector with its
//! own pull-up and reads low when gas is present.  No debouncing: the
//! 10 ms loop samples each input once per tick.
//!
//! A failed pin read is logged and the previous level is reused.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::error::{Error, SensorError};
use crate::fsm::context::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Button {
    Enter = 0,
    Test = 1,
    A = 2,
    B = 3,
    C = 4,
    D = 5,
}

impl Button {
    pub const COUNT: usize = 6;
}

pub struct ButtonBus<P, G> {
    /// Button pins in [`Button`] order.
    buttons: [P; Button::COUNT],
    gas_line: G,
    last: InputSnapshot,
}

impl<P: InputPin, G: InputPin> ButtonBus<P, G> {
    pub fn new(buttons: [P; Button::COUNT], gas_line: G) -> Self {
        Self {
            buttons,
            gas_line,
            // Clean air until the first successful read.
            last: InputSnapshot {
                gas_line_active: true,
                ..InputSnapshot::default()
            },
        }
    }

    /// Sample every input once.
    pub fn read(&mut self) -> InputSnapshot {
        let prev = self.last;
        let snap = InputSnapshot {
            enter: self.read_button(Button::Enter, prev.enter),
            test: self.read_button(Button::Test, prev.test),
            a: self.read_button(Button::A, prev.a),
            b: self.read_button(Button::B, prev.b),
            c: self.read_button(Button::C, prev.c),
            d: self.read_button(Button::D, prev.d),
            gas_line_active: match self.gas_line.is_high() {
                Ok(level) => level,
                Err(e) => {
                    warn!("Gas line: {} ({:?})", Error::from(SensorError::GpioReadFailed), e);
                    prev.gas_line_active
                }
            },
        };
        self.last = snap;
        snap
    }

    fn read_button(&mut self, button: Button, fallback: bool) -> bool {
        match self.buttons[button as usize].is_high() {
            Ok(pressed) => pressed,
            Err(e) => {
                warn!(
                    "Button {:?}: {} ({:?})",
                    button,
                    Error::from(SensorError::GpioReadFailed),
                    e
                );
                fallback
            }
        }
    }
}
