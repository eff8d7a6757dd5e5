//! In-memory board for the host simulator and unit tests.
//!
//! Every simulated peripheral is a cheap handle over shared state: the
//! copy moved into the [`HardwareAdapter`] and the copy kept by the
//! caller observe the same levels, so a test (or the simulator front
//! end) can press buttons and inspect LEDs while the service runs.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use log::{debug, warn};

use crate::app::ports::{AnalogPort, SerialPort};
use crate::drivers::button_bus::ButtonBus;
use crate::drivers::indicator_leds::IndicatorLeds;
use crate::drivers::siren::Siren;
use crate::error::{Error, SerialError};

use super::hardware::HardwareAdapter;

// ── Pins ──────────────────────────────────────────────────────

/// Error returned by a [`SimPin`] switched into fault mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinFault;

impl digital::Error for SimPinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct PinState {
    level: Cell<bool>,
    faulty: Cell<bool>,
    writes: Cell<u32>,
}

/// A GPIO that is both readable and writable.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<PinState>);

impl SimPin {
    pub fn new(level: bool) -> Self {
        let pin = Self::default();
        pin.0.level.set(level);
        pin
    }

    pub fn level(&self) -> bool {
        self.0.level.get()
    }

    /// Drive the level from outside (a button press, the gas module).
    pub fn set_level(&self, level: bool) {
        self.0.level.set(level);
    }

    /// Make every subsequent read and write fail.
    pub fn set_faulty(&self, faulty: bool) {
        self.0.faulty.set(faulty);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> u32 {
        self.0.writes.get()
    }

    fn check(&self) -> Result<(), SimPinFault> {
        if self.0.faulty.get() {
            Err(SimPinFault)
        } else {
            Ok(())
        }
    }

    fn write(&mut self, level: bool) -> Result<(), SimPinFault> {
        self.check()?;
        self.0.level.set(level);
        self.0.writes.set(self.0.writes.get() + 1);
        Ok(())
    }
}

impl ErrorType for SimPin {
    type Error = SimPinFault;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.0.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

// ── Analog ────────────────────────────────────────────────────

/// Both analog channels, as fractions of VREF.
#[derive(Debug, Clone, Default)]
pub struct SimAnalog {
    temperature: Rc<Cell<f32>>,
    potentiometer: Rc<Cell<f32>>,
}

impl SimAnalog {
    pub fn set_temperature_raw(&self, fraction: f32) {
        self.temperature.set(fraction.clamp(0.0, 1.0));
    }

    /// Convenience for the LM35: convert °C to the fraction it would read.
    pub fn set_temperature_c(&self, celsius: f32, volts_per_degree: f32, vref_volts: f32) {
        self.set_temperature_raw(celsius * volts_per_degree / vref_volts);
    }

    pub fn set_potentiometer(&self, fraction: f32) {
        self.potentiometer.set(fraction.clamp(0.0, 1.0));
    }
}

impl AnalogPort for SimAnalog {
    fn read_temperature_raw(&mut self) -> f32 {
        self.temperature.get()
    }

    fn read_potentiometer(&mut self) -> f32 {
        self.potentiometer.get()
    }
}

// ── Serial ────────────────────────────────────────────────────

/// Scripted serial line: bytes are queued by the caller, output is
/// captured for inspection.
#[derive(Debug, Clone, Default)]
pub struct SimSerial {
    rx: Rc<RefCell<VecDeque<u8>>>,
    tx: Rc<RefCell<Vec<u8>>>,
}

impl SimSerial {
    pub fn push_input(&self, bytes: &[u8]) {
        self.rx.borrow_mut().extend(bytes.iter().copied());
    }

    /// Drain everything written so far.
    pub fn take_output(&self) -> Vec<u8> {
        core::mem::take(&mut *self.tx.borrow_mut())
    }
}

impl SerialPort for SimSerial {
    fn readable(&mut self) -> bool {
        !self.rx.borrow().is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.borrow_mut().pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.tx.borrow_mut().extend_from_slice(bytes);
    }
}

/// Console on the process's stdin/stdout.
///
/// A reader thread forwards stdin bytes over a channel so the main loop
/// never blocks on input.
pub struct StdioSerial {
    rx: Receiver<u8>,
    pending: Option<u8>,
    closed: bool,
}

impl StdioSerial {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for byte in stdin.lock().bytes() {
                match byte {
                    Ok(b) => {
                        if tx.send(b).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("stdin: {} ({})", Error::from(SerialError::ReadFailed), e);
                        break;
                    }
                }
            }
        });
        Self {
            rx,
            pending: None,
            closed: false,
        }
    }

    fn fill(&mut self) {
        if self.pending.is_some() || self.closed {
            return;
        }
        match self.rx.try_recv() {
            Ok(b) => self.pending = Some(b),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                debug!("stdin closed");
                self.closed = true;
            }
        }
    }
}

impl SerialPort for StdioSerial {
    fn readable(&mut self) -> bool {
        self.fill();
        self.pending.is_some()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.fill();
        self.pending.take()
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
            warn!("stdout: {} ({})", Error::from(SerialError::WriteFailed), e);
        }
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Blocking delay on the host thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

// ── Board ─────────────────────────────────────────────────────

/// Simulated board with a caller-chosen serial transport.
pub type SimBoard<U> = HardwareAdapter<SimPin, SimPin, SimPin, SimPin, SimAnalog, U>;

/// The caller's side of every simulated peripheral.
#[derive(Debug, Clone)]
pub struct SimHandles {
    /// Enter, Test, A, B, C, D.
    pub buttons: [SimPin; 6],
    /// MQ-2 DOUT; high means clean air.
    pub gas_line: SimPin,
    /// Alarm, Incorrect, Lockout.
    pub leds: [SimPin; 3],
    pub siren: SimPin,
    pub analog: SimAnalog,
}

/// Build a simulated board in its idle state: buttons released, clean
/// air, room temperature at zero volts.
pub fn sim_board<U: SerialPort>(serial: U) -> (SimBoard<U>, SimHandles) {
    let handles = SimHandles {
        buttons: core::array::from_fn(|_| SimPin::new(false)),
        gas_line: SimPin::new(true),
        leds: core::array::from_fn(|_| SimPin::new(false)),
        siren: SimPin::new(true),
        analog: SimAnalog::default(),
    };
    let board = HardwareAdapter::new(
        ButtonBus::new(handles.buttons.clone(), handles.gas_line.clone()),
        IndicatorLeds::new(handles.leds.clone()),
        Siren::new(handles.siren.clone()),
        handles.analog.clone(),
        serial,
    );
    (board, handles)
}
