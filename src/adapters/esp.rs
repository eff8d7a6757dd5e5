//! ESP32-S3 board bring-up.
//!
//! GPIO goes through `esp-idf-hal` [`PinDriver`]s, which implement the
//! `embedded-hal` 1.0 traits the drivers are generic over.  ADC1 uses the
//! oneshot API through raw sys calls.  The console is UART0 at 115200 8N1.
//!
//! Every pin number comes from [`crate::pins`].

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, Input, InputOutput, Output, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::{AnalogPort, SerialPort};
use crate::drivers::button_bus::ButtonBus;
use crate::drivers::indicator_leds::IndicatorLeds;
use crate::drivers::siren::Siren;
use crate::error::{Error, Result, SensorError, SerialError};
use crate::pins;

use super::hardware::HardwareAdapter;

type InPin = PinDriver<'static, AnyIOPin, Input>;
type OutPin = PinDriver<'static, AnyIOPin, Output>;
type OdPin = PinDriver<'static, AnyIOPin, InputOutput>;

/// The real board.
pub type EspBoard = HardwareAdapter<InPin, InPin, OutPin, OdPin, EspAdc1, EspConsole>;

/// Full-scale count of a 12-bit conversion.
const ADC_FULL_SCALE: f32 = 4095.0;

// ── ADC1 (oneshot) ────────────────────────────────────────────

/// ADC1 with the LM35 and potentiometer channels configured.
pub struct EspAdc1 {
    handle: adc_oneshot_unit_handle_t,
    last_temperature: f32,
    last_potentiometer: f32,
}

impl EspAdc1 {
    pub fn new() -> Result<Self> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: init_cfg and handle outlive the call; ADC1 is claimed once.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("ADC1 unit"));
        }

        // 12 dB attenuation covers the full 0-3.3 V range.
        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        for channel in [pins::LM35_ADC1_CHANNEL, pins::POT_ADC1_CHANNEL] {
            // SAFETY: handle was returned by adc_oneshot_new_unit above.
            let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
            if ret != ESP_OK as i32 {
                // SAFETY: handle is valid and not used after this.
                unsafe { adc_oneshot_del_unit(handle) };
                return Err(Error::Init("ADC1 channel"));
            }
        }

        info!(
            "ADC1 configured (CH{}=LM35, CH{}=pot)",
            pins::LM35_ADC1_CHANNEL,
            pins::POT_ADC1_CHANNEL
        );
        Ok(Self {
            handle,
            last_temperature: 0.0,
            last_potentiometer: 0.0,
        })
    }

    fn read_fraction(&mut self, channel: adc_channel_t) -> Result<f32> {
        let mut raw: i32 = 0;
        // SAFETY: handle is valid for the lifetime of self; main-loop only.
        let ret = unsafe { adc_oneshot_read(self.handle, channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed.into());
        }
        Ok(raw.clamp(0, ADC_FULL_SCALE as i32) as f32 / ADC_FULL_SCALE)
    }
}

impl Drop for EspAdc1 {
    fn drop(&mut self) {
        // SAFETY: handle came from adc_oneshot_new_unit and is dropped once.
        unsafe { adc_oneshot_del_unit(self.handle) };
    }
}

impl AnalogPort for EspAdc1 {
    fn read_temperature_raw(&mut self) -> f32 {
        match self.read_fraction(pins::LM35_ADC1_CHANNEL) {
            Ok(v) => self.last_temperature = v,
            Err(e) => warn!("LM35: {}", e),
        }
        self.last_temperature
    }

    fn read_potentiometer(&mut self) -> f32 {
        match self.read_fraction(pins::POT_ADC1_CHANNEL) {
            Ok(v) => self.last_potentiometer = v,
            Err(e) => warn!("Potentiometer: {}", e),
        }
        self.last_potentiometer
    }
}

// ── UART console ──────────────────────────────────────────────

pub struct EspConsole {
    uart: UartDriver<'static>,
}

impl SerialPort for EspConsole {
    fn readable(&mut self) -> bool {
        self.uart.remaining_read().map(|n| n > 0).unwrap_or(false)
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf, NON_BLOCK) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e) => {
                warn!("UART: {} ({})", Error::from(SerialError::ReadFailed), e);
                None
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.uart.write(rest) {
                Ok(0) => {
                    warn!("UART: {}", Error::from(SerialError::ShortWrite));
                    return;
                }
                Ok(n) => rest = &rest[n..],
                Err(e) => {
                    warn!("UART: {} ({})", Error::from(SerialError::WriteFailed), e);
                    return;
                }
            }
        }
    }
}

// ── Board assembly ────────────────────────────────────────────

fn gpio(num: i32) -> AnyIOPin {
    // SAFETY: each GPIO number in `pins` is claimed exactly once, here.
    unsafe { AnyIOPin::new(num) }
}

fn input(num: i32, pull: Pull) -> Result<InPin> {
    let mut pin = PinDriver::input(gpio(num)).map_err(|_| Error::Init("GPIO input"))?;
    pin.set_pull(pull).map_err(|_| Error::Init("GPIO pull"))?;
    Ok(pin)
}

fn output(num: i32) -> Result<OutPin> {
    PinDriver::output(gpio(num)).map_err(|_| Error::Init("GPIO output"))
}

/// Claim every peripheral the alarm uses and assemble the board.
pub fn take_board() -> Result<EspBoard> {
    let peripherals = Peripherals::take().map_err(|_| Error::Init("peripherals already taken"))?;

    let buttons = [
        input(pins::ENTER_BUTTON_GPIO, Pull::Down)?,
        input(pins::TEST_BUTTON_GPIO, Pull::Down)?,
        input(pins::A_BUTTON_GPIO, Pull::Down)?,
        input(pins::B_BUTTON_GPIO, Pull::Down)?,
        input(pins::C_BUTTON_GPIO, Pull::Down)?,
        input(pins::D_BUTTON_GPIO, Pull::Down)?,
    ];
    // MQ-2 DOUT has its own pull-up on the module.
    let gas_line = input(pins::MQ2_DOUT_GPIO, Pull::Floating)?;

    let leds = [
        output(pins::ALARM_LED_GPIO)?,
        output(pins::INCORRECT_LED_GPIO)?,
        output(pins::LOCKOUT_LED_GPIO)?,
    ];

    let siren = PinDriver::input_output_od(gpio(pins::SIREN_GPIO))
        .map_err(|_| Error::Init("siren GPIO"))?;

    let uart_cfg = UartConfig::default().baudrate(Hertz(pins::UART_BAUD));
    let uart = UartDriver::new(
        peripherals.uart0,
        gpio(pins::UART_TX_GPIO),
        gpio(pins::UART_RX_GPIO),
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_cfg,
    )
    .map_err(|_| Error::Init("UART0"))?;

    let board = HardwareAdapter::new(
        ButtonBus::new(buttons, gas_line),
        IndicatorLeds::new(leds),
        Siren::new(siren),
        EspAdc1::new()?,
        EspConsole { uart },
    );
    info!("Board ready");
    Ok(board)
}
