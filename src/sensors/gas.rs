//! MQ-2 gas detector digital output.
//!
//! The module's comparator pulls DOUT low when the gas concentration
//! crosses its trimmer threshold, so "line inactive" means gas present.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasReading {
    pub line_active: bool,
    pub detected: bool,
}

pub fn read(line_active: bool) -> GasReading {
    GasReading {
        line_active,
        detected: !line_active,
    }
}
