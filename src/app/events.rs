//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The log adapter prints
//! them; tests record them.

use core::fmt;

use crate::fsm::StateId;
use crate::fsm::context::InputSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The alarm armed; flags show which latches were set on entry.
    Armed { gas: bool, over_temp: bool },

    /// The alarm returned to Disarmed.
    Disarmed,

    /// A disarm code matched.
    CodeAccepted,

    /// A disarm code did not match.
    CodeRejected { attempts: u8 },

    /// Consecutive failures reached the lockout threshold.
    LockedOut,

    /// The stored code was overwritten from the console.
    CodeProgrammed,

    /// Once-per-tick diagnostic line.
    Status(StatusLine),
}

/// Raw button levels and the alarm flag, as printed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub inputs: InputSnapshot,
    pub armed: bool,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.inputs;
        write!(
            f,
            "Enter Button: {}, Alarm Test Button: {}, A Button: {}, B Button: {}, C Button: {}, D Button: {}, Alarm LED: {}",
            u8::from(i.enter),
            u8::from(i.test),
            u8::from(i.a),
            u8::from(i.b),
            u8::from(i.c),
            u8::from(i.d),
            u8::from(self.armed),
        )
    }
}
