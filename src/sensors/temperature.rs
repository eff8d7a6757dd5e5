//! LM35 analog temperature sensor.
//!
//! The LM35 outputs 10 mV/°C.  Readings arrive normalised to 0.0–1.0 of
//! VREF, are pushed into a fixed ring buffer, and the Celsius value is
//! derived from the mean of the whole window.  Slots start at zero, so the
//! average ramps up over the first [`AVG_SAMPLES`] ticks after boot.

/// Window length of the rolling average.
pub const AVG_SAMPLES: usize = 100;

/// Fixed-capacity ring of the most recent raw samples.
#[derive(Debug, Clone)]
pub struct TemperatureHistory<const N: usize> {
    samples: [f32; N],
    index: usize,
}

impl<const N: usize> TemperatureHistory<N> {
    pub const fn new() -> Self {
        Self {
            samples: [0.0; N],
            index: 0,
        }
    }

    /// Overwrite the oldest slot and advance the write index.
    pub fn push(&mut self, raw: f32) {
        self.samples[self.index] = raw;
        self.index = (self.index + 1) % N;
    }

    /// Mean over every slot, recomputed on each call.
    pub fn average(&self) -> f32 {
        let sum: f32 = self.samples.iter().sum();
        sum / N as f32
    }

    /// Next slot to be written.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<const N: usize> Default for TemperatureHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TemperatureReading {
    /// Rolling mean of the raw analog samples.
    pub avg_raw: f32,
    pub celsius: f32,
    pub over_temp: bool,
}

pub struct TemperatureSensor {
    history: TemperatureHistory<AVG_SAMPLES>,
    celsius_per_unit: f32,
    threshold_c: f32,
}

impl TemperatureSensor {
    pub fn new(celsius_per_unit: f32, over_temp_threshold_c: f32) -> Self {
        Self {
            history: TemperatureHistory::new(),
            celsius_per_unit,
            threshold_c: over_temp_threshold_c,
        }
    }

    pub fn update(&mut self, raw: f32) -> TemperatureReading {
        self.history.push(raw);
        let avg_raw = self.history.average();
        let celsius = avg_raw * self.celsius_per_unit;
        TemperatureReading {
            avg_raw,
            celsius,
            over_temp: celsius > self.threshold_c,
        }
    }
}

/// Convert Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}
