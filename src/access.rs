//! Disarm code validation.
//!
//! The validator owns the stored code, the consecutive-failure counter and
//! the two indicator flags that belong to code entry: "incorrect code" and
//! "locked out".  It runs **every tick after the FSM**, fed with the input
//! snapshot, and reports a [`MatchResult`] whenever a comparison happened.
//!
//! ## Attempt lifecycle
//!
//! 1. The user sets A–D and presses enter while the alarm is armed.
//! 2. A mismatch lights the incorrect LED and bumps the counter.  Further
//!    button comparisons are suppressed while the LED is lit.
//! 3. Pressing all four code buttons with enter released clears the LED.
//! 4. A match zeroes the counter; the service disarms the alarm.
//! 5. Reaching the lockout threshold latches lockout for good.  Button
//!    comparisons and the LED housekeeping stop; the serial console can
//!    still try codes but the lockout indicator never clears.

use crate::config::{AlarmConfig, CODE_LENGTH};
use crate::fsm::context::InputSnapshot;
use log::{error, info, warn};

/// The stored disarm sequence, one bit per code button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeStore([bool; CODE_LENGTH]);

impl CodeStore {
    pub const fn new(digits: [bool; CODE_LENGTH]) -> Self {
        Self(digits)
    }

    pub fn digits(&self) -> [bool; CODE_LENGTH] {
        self.0
    }

    pub fn matches(&self, candidate: &[bool; CODE_LENGTH]) -> bool {
        self.0 == *candidate
    }
}

/// Interpret a console byte as a code digit.
pub fn parse_digit(byte: u8) -> Option<bool> {
    match byte {
        b'1' => Some(true),
        b'0' => Some(false),
        _ => None,
    }
}

/// Outcome of one comparison against the stored code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    /// Consecutive failures after this attempt.
    pub failed_attempts: u8,
    /// This attempt is the one that engaged lockout.
    pub lockout_engaged: bool,
}

/// Code entry validator.
#[derive(Debug, Clone)]
pub struct CodeValidator {
    code: CodeStore,
    failed_attempts: u8,
    lockout_threshold: u8,
    incorrect: bool,
    locked_out: bool,
}

impl CodeValidator {
    pub fn new(config: &AlarmConfig) -> Self {
        Self {
            code: CodeStore::new(config.default_code),
            failed_attempts: 0,
            lockout_threshold: config.lockout_threshold,
            incorrect: false,
            locked_out: false,
        }
    }

    /// Per-tick button handling.
    ///
    /// Returns `Some` only when a comparison was made.
    pub fn update_buttons(&mut self, inputs: &InputSnapshot, armed: bool) -> Option<MatchResult> {
        if self.locked_out {
            return None;
        }

        if inputs.all_keys_pressed() && !inputs.enter && self.incorrect {
            info!("Code: incorrect indicator cleared");
            self.incorrect = false;
        }

        if inputs.enter && !self.incorrect && armed {
            return Some(self.try_button_entry(inputs.keys()));
        }

        None
    }

    /// Compare the four button levels against the stored code.
    pub fn try_button_entry(&mut self, keys: [bool; CODE_LENGTH]) -> MatchResult {
        self.record(self.code.matches(&keys))
    }

    /// Compare four console bytes against the stored code.  Any byte other
    /// than `'0'`/`'1'` makes the attempt incorrect.
    pub fn try_serial_entry(&mut self, bytes: &[u8; CODE_LENGTH]) -> MatchResult {
        let matched = bytes
            .iter()
            .zip(self.code.digits())
            .all(|(&b, digit)| parse_digit(b) == Some(digit));
        let result = self.record(matched);
        if matched {
            self.incorrect = false;
        }
        result
    }

    /// Overwrite the stored code from four console bytes.  Bytes other
    /// than `'0'`/`'1'` leave that digit unchanged.
    pub fn program_new_code(&mut self, bytes: &[u8; CODE_LENGTH]) -> CodeStore {
        let mut digits = self.code.digits();
        for (slot, &b) in digits.iter_mut().zip(bytes) {
            if let Some(d) = parse_digit(b) {
                *slot = d;
            }
        }
        self.code = CodeStore::new(digits);
        info!("Code: new code programmed");
        self.code
    }

    pub fn code(&self) -> CodeStore {
        self.code
    }

    pub fn failed_attempts(&self) -> u8 {
        self.failed_attempts
    }

    pub fn incorrect_indicator(&self) -> bool {
        self.incorrect
    }

    pub fn is_locked_out(&self) -> bool {
        self.locked_out
    }

    // ── Internal ──────────────────────────────────────────────────

    fn record(&mut self, matched: bool) -> MatchResult {
        let mut lockout_engaged = false;
        if matched {
            info!("Code: accepted");
            self.failed_attempts = 0;
        } else {
            self.incorrect = true;
            self.failed_attempts = self.failed_attempts.saturating_add(1);
            warn!("Code: rejected ({} consecutive)", self.failed_attempts);
            if !self.locked_out && self.failed_attempts >= self.lockout_threshold {
                error!("Code: LOCKOUT after {} failed attempts", self.failed_attempts);
                self.locked_out = true;
                lockout_engaged = true;
            }
        }
        MatchResult {
            matched,
            failed_attempts: self.failed_attempts,
            lockout_engaged,
        }
    }
}
