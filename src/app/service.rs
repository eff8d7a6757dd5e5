//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the FSM, the sensor sampler, the console and the
//! shared context.  All I/O flows through port traits injected at call
//! sites, making the entire alarm testable with mock adapters.
//!
//! ```text
//!   InputPort ─┐
//!  AnalogPort ─┼──▶ ┌────────────────────────────┐ ──▶ EventSink
//!  SerialPort ◀┼──▶ │         AppService         │
//! ActuatorPort◀┘    │ Sampler · FSM · Code · Tty │
//!                   └────────────────────────────┘
//! ```

use log::info;

use crate::config::AlarmConfig;
use crate::console::{Console, ConsoleView};
use crate::fsm::context::AlarmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::SensorSampler;

use super::commands::AppCommand;
use super::events::{AppEvent, StatusLine};
use super::ports::{ActuatorPort, BoardPort, EventSink, SerialPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all alarm logic.
pub struct AppService {
    fsm: Fsm,
    ctx: AlarmContext,
    sampler: SensorSampler,
    console: Console,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: AlarmConfig) -> Self {
        let sampler = SensorSampler::new(&config);
        let console = Console::new(config.code_entry_timeout_ms);
        let ctx = AlarmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Disarmed);

        Self {
            fsm,
            ctx,
            sampler,
            console,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Disarmed and put the outputs in a known state.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.apply_outputs(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full tick: inputs → sampler → alarm activation → code
    /// entry → console → outputs → status line.
    pub fn tick(&mut self, hw: &mut impl BoardPort, sink: &mut impl EventSink) {
        let prev_state = self.fsm.current_state();

        // 1. Snapshot inputs and sample the sensors
        let inputs = hw.read_inputs();
        let raw_temp = hw.read_temperature_raw();
        self.ctx.inputs = inputs;
        self.ctx.sensors = self.sampler.sample(raw_temp, inputs.gas_line_active);

        // 2. Activation
        self.fsm.tick(&mut self.ctx);
        if self.fsm.current_state() != prev_state {
            self.emit_state_change(sink);
        }

        // 3. Deactivation by buttons
        let armed = self.fsm.current_state().is_armed();
        if let Some(result) = self.ctx.access.update_buttons(&inputs, armed) {
            self.handle_match(result, sink);
        }

        // 4. Serial console
        let view = self.console_view();
        let now_ms = self.ctx.total_ticks * u64::from(self.ctx.tick_period_ms);
        if let Some(cmd) = self.console.poll(hw, &view, now_ms) {
            self.handle_command(cmd, hw, sink);
        }

        // 5. Outputs
        self.sync_indicators();
        self.apply_outputs(hw);

        // 6. Diagnostic status line
        sink.emit(&AppEvent::Status(StatusLine {
            inputs,
            armed: self.fsm.current_state().is_armed(),
        }));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a completed console entry.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        port: &mut impl SerialPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::SubmitCode(bytes) => {
                let result = self.ctx.access.try_serial_entry(&bytes);
                self.console.report_code_checked(port, result.matched);
                self.handle_match(result, sink);
            }
            AppCommand::ProgramCode(bytes) => {
                self.ctx.access.program_new_code(&bytes);
                self.console.report_code_programmed(port);
                sink.emit(&AppEvent::CodeProgrammed);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current alarm state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Read-only access to the shared context (for diagnostics and tests).
    pub fn context(&self) -> &AlarmContext {
        &self.ctx
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Loop period from configuration.
    pub fn tick_period_ms(&self) -> u32 {
        self.ctx.tick_period_ms
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_match(&mut self, result: crate::access::MatchResult, sink: &mut impl EventSink) {
        if result.matched {
            sink.emit(&AppEvent::CodeAccepted);
            if self.fsm.current_state().is_armed() {
                self.fsm.force_transition(StateId::Disarmed, &mut self.ctx);
                sink.emit(&AppEvent::Disarmed);
            }
        } else {
            sink.emit(&AppEvent::CodeRejected {
                attempts: result.failed_attempts,
            });
            if result.lockout_engaged {
                sink.emit(&AppEvent::LockedOut);
            }
        }
    }

    fn emit_state_change(&self, sink: &mut impl EventSink) {
        match self.fsm.current_state() {
            StateId::Armed => sink.emit(&AppEvent::Armed {
                gas: self.ctx.latches.gas,
                over_temp: self.ctx.latches.over_temp,
            }),
            StateId::Disarmed => sink.emit(&AppEvent::Disarmed),
        }
    }

    fn console_view(&self) -> ConsoleView {
        ConsoleView {
            armed: self.fsm.current_state().is_armed(),
            gas_present: self.ctx.sensors.gas_detected,
            over_temp: self.ctx.sensors.over_temp,
            temp_c: self.ctx.sensors.temp_c,
        }
    }

    /// Mirror the validator's indicator flags into the output commands.
    fn sync_indicators(&mut self) {
        self.ctx.commands.incorrect_led = self.ctx.access.incorrect_indicator();
        self.ctx.commands.lockout_led = self.ctx.access.is_locked_out();
    }

    /// Push the current output commands to the actuators.
    fn apply_outputs(&self, hw: &mut impl ActuatorPort) {
        let cmd = &self.ctx.commands;
        hw.set_alarm_led(cmd.alarm_led);
        hw.set_incorrect_led(cmd.incorrect_led);
        hw.set_lockout_led(cmd.lockout_led);
        if cmd.siren_driven {
            hw.drive_siren();
        } else {
            hw.release_siren();
        }
    }
}
