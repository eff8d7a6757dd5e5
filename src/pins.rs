//! GPIO / peripheral pin assignments for the ESP32-S3 alarm board.
//!
//! Single source of truth: the board bring-up references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Front-panel buttons (to 3V3, internal pull-down: pressed = HIGH)
// ---------------------------------------------------------------------------

pub const ENTER_BUTTON_GPIO: i32 = 4;
pub const TEST_BUTTON_GPIO: i32 = 5;
pub const A_BUTTON_GPIO: i32 = 6;
pub const B_BUTTON_GPIO: i32 = 7;
pub const C_BUTTON_GPIO: i32 = 15;
pub const D_BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Gas detector
// ---------------------------------------------------------------------------

/// MQ-2 module DOUT.  LOW = gas above the module's trim-pot threshold.
pub const MQ2_DOUT_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// Indicators and siren
// ---------------------------------------------------------------------------

pub const ALARM_LED_GPIO: i32 = 11;
pub const INCORRECT_LED_GPIO: i32 = 12;
pub const LOCKOUT_LED_GPIO: i32 = 13;

/// Open-drain: LOW sounds the siren, released (Hi-Z) silences it.
pub const SIREN_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Analog (ADC1)
// ---------------------------------------------------------------------------

/// LM35 output, GPIO 1 = ADC1 channel 0 on ESP32-S3.
pub const LM35_ADC1_CHANNEL: u32 = 0;
/// Potentiometer wiper, GPIO 2 = ADC1 channel 1.
pub const POT_ADC1_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Serial console (UART0)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
pub const UART_BAUD: u32 = 115_200;
