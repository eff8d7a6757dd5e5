//! Fixed-period main loop.
//!
//! One iteration runs a full [`AppService::tick`] and then sleeps for the
//! configured period.  The sleep is not shortened by the time the tick
//! took, so the effective period is `tick_period_ms` plus processing
//! time; nothing in the alarm depends on wall-clock accuracy.
//!
//! ```text
//!   ┌──────────────┐     ┌──────────────────┐
//!   │ app.tick(hw) │ ──▶ │ delay(period_ms) │ ──┐
//!   └──────────────┘     └──────────────────┘   │
//!          ▲                                    │
//!          └────────────────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;

use crate::app::ports::{BoardPort, EventSink};
use crate::app::service::AppService;

pub struct Scheduler<D> {
    delay: D,
    period_ms: u32,
    iterations: u64,
}

impl<D: DelayNs> Scheduler<D> {
    pub fn new(delay: D, period_ms: u32) -> Self {
        Self {
            delay,
            period_ms,
            iterations: 0,
        }
    }

    /// Run one tick followed by one period of sleep.
    pub fn run_once(
        &mut self,
        app: &mut AppService,
        hw: &mut impl BoardPort,
        sink: &mut impl EventSink,
    ) {
        app.tick(hw, sink);
        self.delay.delay_ms(self.period_ms);
        self.iterations += 1;
    }

    /// Run forever.
    pub fn run(
        mut self,
        app: &mut AppService,
        hw: &mut impl BoardPort,
        sink: &mut impl EventSink,
    ) -> ! {
        loop {
            self.run_once(app, hw, sink);
        }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
