//! Board drivers, generic over `embedded-hal` 1.0 pin traits.

pub mod button_bus;
pub mod indicator_leds;
pub mod siren;
