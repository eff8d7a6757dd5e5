//! Siren driver on an open-drain output.
//!
//! The siren module sinks current through the MCU pin: pulling the line
//! low sounds it, letting it float (open-drain high = high impedance)
//! silences it.  The pin must be configured open-drain by the board
//! bring-up code; this driver only ever writes the level.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::{ActuatorError, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SirenState {
    Released,
    Driven,
}

pub struct Siren<P> {
    pin: P,
    state: SirenState,
}

impl<P: OutputPin> Siren<P> {
    /// Take the pin and release it immediately.
    pub fn new(pin: P) -> Self {
        let mut siren = Self {
            pin,
            state: SirenState::Driven,
        };
        siren.release();
        siren
    }

    pub fn drive(&mut self) {
        if self.state == SirenState::Driven {
            return;
        }
        match self.pin.set_low() {
            Ok(()) => self.state = SirenState::Driven,
            Err(e) => warn!("Siren: {} ({:?})", Error::from(ActuatorError::GpioWriteFailed), e),
        }
    }

    pub fn release(&mut self) {
        if self.state == SirenState::Released {
            return;
        }
        match self.pin.set_high() {
            Ok(()) => self.state = SirenState::Released,
            Err(e) => warn!("Siren: {} ({:?})", Error::from(ActuatorError::GpioWriteFailed), e),
        }
    }

    pub fn state(&self) -> SirenState {
        self.state
    }

    pub fn is_driven(&self) -> bool {
        self.state == SirenState::Driven
    }
}
