//! Sensor subsystem: individual sensors and the aggregating [`SensorSampler`].
//!
//! The sampler owns the temperature history and produces a
//! [`SensorReadings`] each tick that gets written into `AlarmContext.sensors`.

pub mod gas;
pub mod temperature;

use crate::config::AlarmConfig;
use crate::fsm::context::SensorReadings;
use temperature::TemperatureSensor;

/// Turns raw per-tick inputs into derived alarm conditions.
pub struct SensorSampler {
    pub temperature: TemperatureSensor,
}

impl SensorSampler {
    pub fn new(config: &AlarmConfig) -> Self {
        Self {
            temperature: TemperatureSensor::new(config.celsius_per_unit(), config.over_temp_level_c),
        }
    }

    /// Record one temperature sample and evaluate both detectors.
    ///
    /// `raw_temp` is the LM35 reading normalised to 0.0–1.0 of VREF;
    /// `gas_line_active` is the raw level of the MQ-2 digital output.
    pub fn sample(&mut self, raw_temp: f32, gas_line_active: bool) -> SensorReadings {
        let temp = self.temperature.update(raw_temp);
        let gas = gas::read(gas_line_active);

        SensorReadings {
            temp_c: temp.celsius,
            over_temp: temp.over_temp,
            gas_detected: gas.detected,
        }
    }
}
