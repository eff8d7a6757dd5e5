//! Application core: pure alarm logic, zero I/O.
//!
//! Sensor sampling, the alarm FSM, code validation and the console are
//! orchestrated here.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
