//! Integration tests for the AppService → FSM → actuators pipeline.
//!
//! These run on the host (x86_64) and drive the full per-tick chain
//! (inputs, sampling, arming, code entry, console, outputs) through mock
//! adapters.

use crate::mock_hw::{LogSink, MockHardware};

use gasalarm::app::events::AppEvent;
use gasalarm::app::service::AppService;
use gasalarm::config::AlarmConfig;
use gasalarm::console::ConsoleMode;
use gasalarm::fsm::StateId;

const CORRECT: [bool; 4] = [true, true, false, false];
const WRONG: [bool; 4] = [true, false, false, false];
const ALL: [bool; 4] = [true; 4];

fn make_app_with(config: AlarmConfig) -> (AppService, MockHardware, LogSink) {
    let mut app = AppService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn make_app() -> (AppService, MockHardware, LogSink) {
    make_app_with(AlarmConfig::default())
}

fn tick_n(app: &mut AppService, hw: &mut MockHardware, sink: &mut LogSink, n: usize) {
    for _ in 0..n {
        app.tick(hw, sink);
    }
}

/// Hold the test button for one tick, then release it.
fn arm_with_test_button(app: &mut AppService, hw: &mut MockHardware, sink: &mut LogSink) {
    hw.inputs.test = true;
    app.tick(hw, sink);
    hw.inputs.test = false;
    assert_eq!(app.state(), StateId::Armed);
}

/// One button attempt: press enter with `keys` for a tick, then release
/// everything.
fn press_code(app: &mut AppService, hw: &mut MockHardware, sink: &mut LogSink, keys: [bool; 4]) {
    hw.set_keys(keys);
    hw.inputs.enter = true;
    app.tick(hw, sink);
    hw.inputs.enter = false;
    hw.set_keys([false; 4]);
}

/// Clear the incorrect indicator: all four code buttons, enter released.
fn clear_incorrect(app: &mut AppService, hw: &mut MockHardware, sink: &mut LogSink) {
    hw.set_keys(ALL);
    hw.inputs.enter = false;
    app.tick(hw, sink);
    hw.set_keys([false; 4]);
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn starts_disarmed_with_outputs_safe() {
    let (app, hw, sink) = make_app();

    assert_eq!(app.state(), StateId::Disarmed);
    assert!(!hw.siren_driven());
    assert!(!hw.alarm_led());
    assert!(!hw.incorrect_led());
    assert!(!hw.lockout_led());
    assert_eq!(sink.events, vec![AppEvent::Started(StateId::Disarmed)]);
}

#[test]
fn quiet_inputs_stay_disarmed() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_temperature_c(22.0);
    tick_n(&mut app, &mut hw, &mut sink, 200);

    assert_eq!(app.state(), StateId::Disarmed);
    assert!(!hw.siren_driven());
    assert_eq!(sink.notable(), vec![AppEvent::Started(StateId::Disarmed)]);
}

// ── Activation ────────────────────────────────────────────────

#[test]
fn test_button_arms_and_latches_both() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    assert!(hw.siren_driven());
    assert_eq!(
        sink.count(&AppEvent::Armed {
            gas: true,
            over_temp: true
        }),
        1
    );

    // Releasing the button does not disarm.
    tick_n(&mut app, &mut hw, &mut sink, 50);
    assert_eq!(app.state(), StateId::Armed);
    assert!(hw.siren_driven());
}

#[test]
fn gas_line_low_arms() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.inputs.gas_line_active = false;
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Armed);
    assert!(app.context().sensors.gas_detected);
    assert!(sink.events.contains(&AppEvent::Armed {
        gas: true,
        over_temp: false
    }));

    // Gas clearing keeps the latch.
    hw.inputs.gas_line_active = true;
    tick_n(&mut app, &mut hw, &mut sink, 5);
    assert_eq!(app.state(), StateId::Armed);
    assert!(app.context().latches.gas);
}

#[test]
fn sustained_sixty_degrees_arms_over_temp() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_temperature_c(60.0);
    tick_n(&mut app, &mut hw, &mut sink, 100);

    let sensors = app.context().sensors;
    assert!(sensors.over_temp);
    assert!((sensors.temp_c - 60.0).abs() < 0.01, "temp_c = {}", sensors.temp_c);
    assert_eq!(app.state(), StateId::Armed);
    assert_eq!(
        sink.count(&AppEvent::Armed {
            gas: false,
            over_temp: true
        }),
        1
    );
}

#[test]
fn average_lags_a_short_spike() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_temperature_c(25.0);
    tick_n(&mut app, &mut hw, &mut sink, 100);

    // Ten samples at 80 °C move a 100-sample mean by only 5.5 °C.
    hw.set_temperature_c(80.0);
    tick_n(&mut app, &mut hw, &mut sink, 10);

    assert!(!app.context().sensors.over_temp);
    assert_eq!(app.state(), StateId::Disarmed);
}

// ── Blinking ──────────────────────────────────────────────────

#[test]
fn both_latched_blinks_every_100ms() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    // The arming tick counts: nine armed ticks so far, 90 ms accumulated.
    tick_n(&mut app, &mut hw, &mut sink, 8);
    assert!(!hw.alarm_led());
    app.tick(&mut hw, &mut sink);
    assert!(hw.alarm_led());

    tick_n(&mut app, &mut hw, &mut sink, 9);
    assert!(hw.alarm_led());
    app.tick(&mut hw, &mut sink);
    assert!(!hw.alarm_led());
}

#[test]
fn gas_only_blinks_every_second() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.inputs.gas_line_active = false;
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Armed);

    tick_n(&mut app, &mut hw, &mut sink, 98);
    assert!(!hw.alarm_led());
    app.tick(&mut hw, &mut sink);
    assert!(hw.alarm_led());
}

#[test]
fn first_toggle_lands_on_tenth_armed_tick() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.inputs.test = true;

    let mut armed_ticks = 0;
    while !hw.alarm_led() {
        app.tick(&mut hw, &mut sink);
        if app.state() == StateId::Armed {
            armed_ticks += 1;
        }
        assert!(armed_ticks <= 100, "alarm LED never lit");
    }
    assert_eq!(armed_ticks, 10);
}

// ── Button code entry ─────────────────────────────────────────

#[test]
fn correct_button_code_disarms() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);
    sink.clear();

    press_code(&mut app, &mut hw, &mut sink, CORRECT);

    assert_eq!(app.state(), StateId::Disarmed);
    assert_eq!(app.context().access.failed_attempts(), 0);
    assert!(!hw.siren_driven());
    assert!(!hw.alarm_led());
    assert_eq!(
        sink.notable(),
        vec![AppEvent::CodeAccepted, AppEvent::Disarmed]
    );
}

#[test]
fn wrong_button_code_counts_once_and_stays_armed() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    hw.set_keys(WRONG);
    hw.inputs.enter = true;
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Armed);
    assert!(hw.incorrect_led());
    assert_eq!(app.context().access.failed_attempts(), 1);

    // Holding enter with the indicator lit does not compare again.
    tick_n(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(app.context().access.failed_attempts(), 1);
    assert_eq!(sink.count(&AppEvent::CodeRejected { attempts: 1 }), 1);
}

#[test]
fn incorrect_indicator_blocks_entry_until_cleared() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    press_code(&mut app, &mut hw, &mut sink, WRONG);
    assert!(hw.incorrect_led());

    // A correct code is ignored while the indicator is lit.
    press_code(&mut app, &mut hw, &mut sink, CORRECT);
    assert_eq!(app.state(), StateId::Armed);

    clear_incorrect(&mut app, &mut hw, &mut sink);
    assert!(!hw.incorrect_led());
    assert_eq!(app.state(), StateId::Armed);

    press_code(&mut app, &mut hw, &mut sink, CORRECT);
    assert_eq!(app.state(), StateId::Disarmed);
}

#[test]
fn buttons_ignored_while_disarmed() {
    let (mut app, mut hw, mut sink) = make_app();
    press_code(&mut app, &mut hw, &mut sink, WRONG);

    assert_eq!(app.context().access.failed_attempts(), 0);
    assert!(!hw.incorrect_led());
    assert_eq!(sink.count(&AppEvent::CodeRejected { attempts: 1 }), 0);
}

#[test]
fn disarm_forces_led_off_mid_blink() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);
    tick_n(&mut app, &mut hw, &mut sink, 10);
    assert!(hw.alarm_led());

    press_code(&mut app, &mut hw, &mut sink, CORRECT);

    assert_eq!(app.state(), StateId::Disarmed);
    assert!(!hw.alarm_led());
    assert!(!hw.siren_driven());
    assert!(!app.context().latches.any());

    tick_n(&mut app, &mut hw, &mut sink, 30);
    assert!(!hw.alarm_led());
    assert!(!hw.siren_driven());
}

#[test]
fn persistent_gas_rearms_after_disarm() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.inputs.gas_line_active = false;
    app.tick(&mut hw, &mut sink);

    press_code(&mut app, &mut hw, &mut sink, CORRECT);
    assert_eq!(app.state(), StateId::Disarmed);

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Armed);
    assert_eq!(sink.count(&AppEvent::Disarmed), 1);
}

// ── Lockout ───────────────────────────────────────────────────

#[test]
fn five_button_failures_lock_out_for_good() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    for attempt in 1..=4u8 {
        press_code(&mut app, &mut hw, &mut sink, WRONG);
        assert_eq!(app.context().access.failed_attempts(), attempt);
        assert!(!hw.lockout_led());
        clear_incorrect(&mut app, &mut hw, &mut sink);
    }

    press_code(&mut app, &mut hw, &mut sink, WRONG);
    assert!(hw.lockout_led());
    assert!(app.context().access.is_locked_out());
    assert_eq!(sink.count(&AppEvent::LockedOut), 1);

    // Housekeeping and comparisons are both gated now.
    clear_incorrect(&mut app, &mut hw, &mut sink);
    assert!(hw.incorrect_led());
    press_code(&mut app, &mut hw, &mut sink, CORRECT);
    assert_eq!(app.state(), StateId::Armed);
    assert!(hw.lockout_led());
}

#[test]
fn serial_failures_count_toward_lockout() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    for _ in 0..3 {
        press_code(&mut app, &mut hw, &mut sink, WRONG);
        clear_incorrect(&mut app, &mut hw, &mut sink);
    }
    for _ in 0..2 {
        hw.type_bytes(b"40000");
        tick_n(&mut app, &mut hw, &mut sink, 2);
    }

    assert_eq!(app.context().access.failed_attempts(), 5);
    assert!(hw.lockout_led());
}

#[test]
fn lockout_survives_a_serial_disarm() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    for _ in 0..5 {
        hw.type_bytes(b"40101");
        tick_n(&mut app, &mut hw, &mut sink, 2);
    }
    assert!(hw.lockout_led());
    hw.take_text();

    hw.type_bytes(b"41100");
    tick_n(&mut app, &mut hw, &mut sink, 2);

    assert!(hw.take_text().contains("The code is correct"));
    assert_eq!(app.state(), StateId::Disarmed);
    assert_eq!(app.context().access.failed_attempts(), 0);

    tick_n(&mut app, &mut hw, &mut sink, 50);
    assert!(hw.lockout_led());
    assert!(app.context().access.is_locked_out());
}

// ── Serial code entry and programming ─────────────────────────

#[test]
fn program_then_enter_new_code() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.type_bytes(b"51010");
    tick_n(&mut app, &mut hw, &mut sink, 2);
    assert_eq!(
        app.context().access.code().digits(),
        [true, false, true, false]
    );
    assert!(hw.take_text().ends_with("****\r\nNew code generated\r\n\r\n"));
    assert_eq!(sink.count(&AppEvent::CodeProgrammed), 1);

    arm_with_test_button(&mut app, &mut hw, &mut sink);
    hw.type_bytes(b"41010");
    tick_n(&mut app, &mut hw, &mut sink, 2);

    assert!(hw.take_text().contains("The code is correct"));
    assert_eq!(app.state(), StateId::Disarmed);
    assert!(!hw.siren_driven());
}

#[test]
fn old_code_rejected_after_programming() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.type_bytes(b"50011");
    tick_n(&mut app, &mut hw, &mut sink, 2);

    arm_with_test_button(&mut app, &mut hw, &mut sink);
    press_code(&mut app, &mut hw, &mut sink, CORRECT);
    assert_eq!(app.state(), StateId::Armed);
    assert!(hw.incorrect_led());
}

#[test]
fn serial_entry_clears_incorrect_indicator() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);
    press_code(&mut app, &mut hw, &mut sink, WRONG);
    assert!(hw.incorrect_led());

    hw.type_bytes(b"41100");
    tick_n(&mut app, &mut hw, &mut sink, 2);

    assert!(!hw.incorrect_led());
    assert_eq!(app.state(), StateId::Disarmed);
}

#[test]
fn non_binary_digit_is_a_failed_attempt() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    hw.type_bytes(b"411x0");
    tick_n(&mut app, &mut hw, &mut sink, 2);

    assert!(hw.take_text().contains("The code is incorrect"));
    assert_eq!(app.context().access.failed_attempts(), 1);
    assert_eq!(app.state(), StateId::Armed);
}

#[test]
fn correct_serial_code_while_disarmed_only_acknowledges() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.type_bytes(b"41100");
    tick_n(&mut app, &mut hw, &mut sink, 2);

    assert!(hw.take_text().contains("The code is correct"));
    assert_eq!(app.state(), StateId::Disarmed);
    assert_eq!(sink.count(&AppEvent::CodeAccepted), 1);
    assert_eq!(sink.count(&AppEvent::Disarmed), 0);
}

#[test]
fn alarm_keeps_blinking_during_slow_entry() {
    let (mut app, mut hw, mut sink) = make_app();
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    hw.type_bytes(b"4");
    tick_n(&mut app, &mut hw, &mut sink, 10);
    assert!(matches!(app.console().mode(), ConsoleMode::Collecting(_)));
    assert!(hw.alarm_led());

    hw.type_bytes(b"1100");
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Disarmed);
}

#[test]
fn entry_timeout_abandons_without_counting() {
    let config = AlarmConfig {
        code_entry_timeout_ms: Some(100),
        ..AlarmConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app_with(config);
    arm_with_test_button(&mut app, &mut hw, &mut sink);

    hw.type_bytes(b"41");
    tick_n(&mut app, &mut hw, &mut sink, 12);

    assert!(hw.take_text().ends_with("*\r\nCode entry timed out\r\n\r\n"));
    assert_eq!(app.console().mode(), &ConsoleMode::AwaitingCommand);
    assert_eq!(app.context().access.failed_attempts(), 0);
    assert_eq!(app.state(), StateId::Armed);
}

// ── Status line ───────────────────────────────────────────────

#[test]
fn status_emitted_every_tick() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();

    hw.inputs.enter = true;
    hw.inputs.test = true;
    tick_n(&mut app, &mut hw, &mut sink, 3);

    let statuses: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Status(line) => Some(*line),
            _ => None,
        })
        .collect();
    assert_eq!(statuses.len(), 3);
    let last = statuses[2];
    assert!(last.armed);
    assert_eq!(
        last.to_string(),
        "Enter Button: 1, Alarm Test Button: 1, A Button: 0, B Button: 0, C Button: 0, D Button: 0, Alarm LED: 1"
    );
}
