//! Gas / over-temperature alarm firmware library.
//!
//! Exposes the pure-logic modules and the generic board adapters for
//! integration testing and the host simulator.  ESP-IDF-specific code
//! lives in `adapters::esp` and is compiled only with the `espidf` feature.

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for ESP-IDF requires `--features espidf`");

pub mod access;
pub mod adapters;
pub mod app;
pub mod config;
pub mod console;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod scheduler;
pub mod sensors;
