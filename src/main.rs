//! Gas Alarm Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter (ButtonBus · IndicatorLeds · Siren · ADC ·    │
//! │                   UART)                        LogEventSink    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Sampler · FSM · CodeValidator · Console               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (tick, then sleep tick_period_ms)                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the ESP32-S3 (`--features espidf`) the board is the real one.  On
//! any other target the same loop runs against the simulated board with
//! stdin/stdout as the serial console.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use gasalarm::adapters::log_sink::LogEventSink;
use gasalarm::app::service::AppService;
use gasalarm::config::AlarmConfig;
use gasalarm::scheduler::Scheduler;

fn main() -> Result<()> {
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GasAlarm v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = AlarmConfig::default();
    config.validate()?;

    let app = AppService::new(config.clone());
    run(&config, app, LogEventSink::new())
}

#[cfg(feature = "espidf")]
fn run(config: &AlarmConfig, mut app: AppService, mut log_sink: LogEventSink) -> Result<()> {
    use esp_idf_hal::delay::FreeRtos;

    let mut hw = gasalarm::adapters::esp::take_board().inspect_err(|e| {
        log::error!("Board init failed: {}", e);
    })?;
    app.start(&mut hw, &mut log_sink);
    info!("System ready. Entering main loop.");
    Scheduler::new(FreeRtos, config.tick_period_ms).run(&mut app, &mut hw, &mut log_sink)
}

#[cfg(not(feature = "espidf"))]
fn run(config: &AlarmConfig, mut app: AppService, mut log_sink: LogEventSink) -> Result<()> {
    use gasalarm::adapters::sim::{StdDelay, StdioSerial, sim_board};

    let (mut hw, handles) = sim_board(StdioSerial::spawn());
    if let Some(celsius) = env_f32("GASALARM_SIM_TEMP_C") {
        handles
            .analog
            .set_temperature_c(celsius, config.volts_per_degree, config.vref_volts);
    }
    if let Some(fraction) = env_f32("GASALARM_SIM_POT") {
        handles.analog.set_potentiometer(fraction);
    }
    if std::env::var_os("GASALARM_SIM_GAS").is_some() {
        handles.gas_line.set_level(false);
    }

    app.start(&mut hw, &mut log_sink);
    info!("Simulator ready. Console on stdin/stdout, 'h' for help.");
    Scheduler::new(StdDelay, config.tick_period_ms).run(&mut app, &mut hw, &mut log_sink)
}

#[cfg(feature = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(feature = "espidf"))]
fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()?;
    Ok(())
}

#[cfg(not(feature = "espidf"))]
fn env_f32(key: &str) -> Option<f32> {
    let value = std::env::var(key).ok()?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("{}={:?} ignored: {}", key, value, e);
            None
        }
    }
}
