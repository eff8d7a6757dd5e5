//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the ESP-IDF logger on the device, `env_logger` on
//! the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::Armed { gas, over_temp } => {
                warn!("ALARM | armed gas={} over_temp={}", gas, over_temp);
            }
            AppEvent::Disarmed => {
                info!("ALARM | disarmed");
            }
            AppEvent::CodeAccepted => {
                info!("CODE  | accepted");
            }
            AppEvent::CodeRejected { attempts } => {
                info!("CODE  | rejected, attempts={}", attempts);
            }
            AppEvent::LockedOut => {
                warn!("CODE  | system locked");
            }
            AppEvent::CodeProgrammed => {
                info!("CODE  | new code programmed");
            }
            AppEvent::Status(line) => {
                info!("{}", line);
            }
        }
    }
}
