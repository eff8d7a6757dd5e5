//! Serial diagnostic console.
//!
//! Single-byte commands, one per tick, read from a non-blocking
//! [`SerialPort`].  Commands `'4'` (enter code) and `'5'` (program code)
//! switch the console into a collecting mode that gathers four more bytes
//! across as many ticks as it takes, echoing `*` for each, while the rest
//! of the loop keeps running.
//!
//! | Byte      | Reply                                   |
//! |-----------|-----------------------------------------|
//! | `1`       | alarm state                             |
//! | `2`       | gas detector line                       |
//! | `3`       | over-temperature flag                   |
//! | `4`       | prompt, collect 4 digits, check code    |
//! | `5`       | prompt, collect 4 digits, program code  |
//! | `p` / `P` | potentiometer, 2 decimals               |
//! | `c` / `C` | temperature °C, 2 decimals              |
//! | `f` / `F` | temperature °F, 2 decimals              |
//! | other     | help listing                            |

pub mod messages;

use core::fmt::Write as _;

use heapless::{String, Vec};
use log::{debug, info, warn};

use crate::app::commands::AppCommand;
use crate::app::ports::{AnalogPort, SerialPort};
use crate::config::CODE_LENGTH;
use crate::sensors::temperature::celsius_to_fahrenheit;

/// A decoded command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    AlarmState,
    GasState,
    OverTempState,
    EnterCode,
    ProgramCode,
    Potentiometer,
    Celsius,
    Fahrenheit,
    Help,
}

impl ConsoleCommand {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'1' => Self::AlarmState,
            b'2' => Self::GasState,
            b'3' => Self::OverTempState,
            b'4' => Self::EnterCode,
            b'5' => Self::ProgramCode,
            b'p' | b'P' => Self::Potentiometer,
            b'c' | b'C' => Self::Celsius,
            b'f' | b'F' => Self::Fahrenheit,
            _ => Self::Help,
        }
    }
}

/// What the collected digits are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPurpose {
    Disarm,
    Program,
}

/// Partially collected interactive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    purpose: EntryPurpose,
    bytes: Vec<u8, CODE_LENGTH>,
    started_ms: u64,
}

impl Collection {
    pub fn purpose(&self) -> EntryPurpose {
        self.purpose
    }

    pub fn remaining(&self) -> usize {
        CODE_LENGTH - self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleMode {
    AwaitingCommand,
    Collecting(Collection),
}

/// Read-only view of system state for status replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleView {
    pub armed: bool,
    /// Gas detector line reads "gas" right now (not the latch).
    pub gas_present: bool,
    pub over_temp: bool,
    pub temp_c: f32,
}

pub struct Console {
    mode: ConsoleMode,
    entry_timeout_ms: Option<u32>,
}

impl Console {
    pub fn new(entry_timeout_ms: Option<u32>) -> Self {
        Self {
            mode: ConsoleMode::AwaitingCommand,
            entry_timeout_ms,
        }
    }

    pub fn mode(&self) -> &ConsoleMode {
        &self.mode
    }

    /// Service the console once.  `now_ms` is loop time, used only for the
    /// optional entry timeout.
    ///
    /// Returns a command when an interactive entry has just completed.
    pub fn poll<P>(&mut self, port: &mut P, view: &ConsoleView, now_ms: u64) -> Option<AppCommand>
    where
        P: SerialPort + AnalogPort,
    {
        match &mut self.mode {
            ConsoleMode::AwaitingCommand => {
                if !port.readable() {
                    return None;
                }
                let byte = port.read_byte()?;
                debug!("Console: command byte 0x{:02x}", byte);
                self.dispatch(ConsoleCommand::from_byte(byte), port, view, now_ms);
                None
            }

            ConsoleMode::Collecting(collection) => {
                while collection.remaining() > 0 {
                    let Some(byte) = port.read_byte() else { break };
                    // Capacity is guaranteed by remaining() > 0.
                    let _ = collection.bytes.push(byte);
                    port.write(messages::DIGIT_ECHO.as_bytes());
                }

                if collection.remaining() == 0 {
                    let mut bytes = [0u8; CODE_LENGTH];
                    bytes.copy_from_slice(&collection.bytes);
                    let cmd = match collection.purpose {
                        EntryPurpose::Disarm => AppCommand::SubmitCode(bytes),
                        EntryPurpose::Program => AppCommand::ProgramCode(bytes),
                    };
                    self.mode = ConsoleMode::AwaitingCommand;
                    return Some(cmd);
                }

                if let Some(timeout) = self.entry_timeout_ms {
                    if now_ms.saturating_sub(collection.started_ms) >= u64::from(timeout) {
                        warn!("Console: {:?} entry timed out", collection.purpose);
                        port.write(messages::ENTRY_TIMED_OUT.as_bytes());
                        self.mode = ConsoleMode::AwaitingCommand;
                    }
                }
                None
            }
        }
    }

    /// Reply to a completed `'4'` entry.
    pub fn report_code_checked(&self, port: &mut impl SerialPort, matched: bool) {
        let msg = if matched {
            messages::CODE_CORRECT
        } else {
            messages::CODE_INCORRECT
        };
        port.write(msg.as_bytes());
    }

    /// Reply to a completed `'5'` entry.
    pub fn report_code_programmed(&self, port: &mut impl SerialPort) {
        port.write(messages::NEW_CODE_GENERATED.as_bytes());
    }

    // ── Internal ──────────────────────────────────────────────────

    fn dispatch<P>(&mut self, cmd: ConsoleCommand, port: &mut P, view: &ConsoleView, now_ms: u64)
    where
        P: SerialPort + AnalogPort,
    {
        match cmd {
            ConsoleCommand::AlarmState => {
                let msg = if view.armed { messages::ALARM_ON } else { messages::ALARM_OFF };
                port.write(msg.as_bytes());
            }
            ConsoleCommand::GasState => {
                let msg = if view.gas_present { messages::GAS_ON } else { messages::GAS_OFF };
                port.write(msg.as_bytes());
            }
            ConsoleCommand::OverTempState => {
                let msg = if view.over_temp {
                    messages::OVER_TEMP_ON
                } else {
                    messages::OVER_TEMP_OFF
                };
                port.write(msg.as_bytes());
            }
            ConsoleCommand::EnterCode => {
                port.write(messages::ENTER_CODE_PROMPT.as_bytes());
                self.begin_collection(EntryPurpose::Disarm, now_ms);
            }
            ConsoleCommand::ProgramCode => {
                port.write(messages::NEW_CODE_PROMPT.as_bytes());
                self.begin_collection(EntryPurpose::Program, now_ms);
            }
            ConsoleCommand::Potentiometer => {
                let reading = port.read_potentiometer();
                let mut line: String<48> = String::new();
                let _ = write!(line, "Potentiometer: {:.2}\r\n", reading);
                port.write(line.as_bytes());
            }
            ConsoleCommand::Celsius => write_temperature(port, view.temp_c, b'C'),
            ConsoleCommand::Fahrenheit => {
                write_temperature(port, celsius_to_fahrenheit(view.temp_c), b'F');
            }
            ConsoleCommand::Help => port.write(messages::HELP.as_bytes()),
        }
    }

    fn begin_collection(&mut self, purpose: EntryPurpose, now_ms: u64) {
        info!("Console: collecting {:?} digits", purpose);
        self.mode = ConsoleMode::Collecting(Collection {
            purpose,
            bytes: Vec::new(),
            started_ms: now_ms,
        });
    }
}

/// `Temperature: 23.45 ° C\r\n` with a raw Latin-1 degree byte.
fn write_temperature(port: &mut impl SerialPort, value: f32, unit: u8) {
    let mut head: String<48> = String::new();
    let _ = write!(head, "Temperature: {:.2} ", value);
    port.write(head.as_bytes());
    port.write(&[messages::DEGREE, b' ', unit, b'\r', b'\n']);
}
