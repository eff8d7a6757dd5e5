//! Three discrete indicator LEDs: alarm, incorrect code, system locked.
//!
//! Levels are tracked in-memory so redundant writes are skipped; the
//! service re-applies every output each tick.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::{ActuatorError, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Indicator {
    Alarm = 0,
    Incorrect = 1,
    Lockout = 2,
}

impl Indicator {
    pub const COUNT: usize = 3;
}

pub struct IndicatorLeds<P> {
    pins: [P; Indicator::COUNT],
    /// Last level successfully written; `None` before the first write.
    levels: [Option<bool>; Indicator::COUNT],
}

impl<P: OutputPin> IndicatorLeds<P> {
    /// Pins in [`Indicator`] order.  All LEDs are switched off.
    pub fn new(pins: [P; Indicator::COUNT]) -> Self {
        let mut leds = Self {
            pins,
            levels: [None; Indicator::COUNT],
        };
        leds.all_off();
        leds
    }

    pub fn set(&mut self, led: Indicator, on: bool) {
        let idx = led as usize;
        if self.levels[idx] == Some(on) {
            return;
        }
        let res = if on {
            self.pins[idx].set_high()
        } else {
            self.pins[idx].set_low()
        };
        match res {
            Ok(()) => self.levels[idx] = Some(on),
            Err(e) => warn!(
                "LED {:?}: {} ({:?})",
                led,
                Error::from(ActuatorError::GpioWriteFailed),
                e
            ),
        }
    }

    pub fn is_on(&self, led: Indicator) -> bool {
        self.levels[led as usize].unwrap_or(false)
    }

    pub fn all_off(&mut self) {
        for led in [Indicator::Alarm, Indicator::Incorrect, Indicator::Lockout] {
            self.set(led, false);
        }
    }
}
