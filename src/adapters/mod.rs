//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                   | Connects to                 |
//! |------------|------------------------------|-----------------------------|
//! | `hardware` | Input/Analog/Actuator/Serial | board drivers (any HAL)     |
//! | `esp`      | Analog, Serial               | ESP32-S3 ADC1, UART0, GPIO  |
//! | `sim`      | Analog, Serial, pins         | in-memory board, stdio      |
//! | `log_sink` | EventSink                    | `log` facade                |

#[cfg(feature = "espidf")]
pub mod esp;
pub mod hardware;
pub mod log_sink;
pub mod sim;
