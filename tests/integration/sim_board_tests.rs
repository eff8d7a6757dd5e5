//! End-to-end runs against the simulated board: service, hardware
//! adapter and embedded-hal drivers all in the loop, observed at the pins.

use gasalarm::adapters::sim::{SimBoard, SimHandles, SimSerial, sim_board};
use gasalarm::app::service::AppService;
use gasalarm::config::AlarmConfig;
use gasalarm::fsm::StateId;

use crate::mock_hw::LogSink;

const ENTER: usize = 0;
const TEST: usize = 1;

struct Rig {
    app: AppService,
    board: SimBoard<SimSerial>,
    pins: SimHandles,
    serial: SimSerial,
    sink: LogSink,
}

impl Rig {
    fn new() -> Self {
        let serial = SimSerial::default();
        let (mut board, pins) = sim_board(serial.clone());
        let mut sink = LogSink::new();
        let mut app = AppService::new(AlarmConfig::default());
        app.start(&mut board, &mut sink);
        Self {
            app,
            board,
            pins,
            serial,
            sink,
        }
    }

    fn tick(&mut self, n: usize) {
        for _ in 0..n {
            self.app.tick(&mut self.board, &mut self.sink);
        }
    }

    fn siren_sounding(&self) -> bool {
        // Open drain: low = driven.
        !self.pins.siren.level()
    }
}

#[test]
fn idle_board_is_quiet() {
    let mut rig = Rig::new();
    rig.tick(20);
    assert_eq!(rig.app.state(), StateId::Disarmed);
    assert!(!rig.siren_sounding());
    assert!(rig.pins.leds.iter().all(|led| !led.level()));
}

#[test]
fn test_button_sounds_siren_and_code_buttons_silence_it() {
    let mut rig = Rig::new();

    rig.pins.buttons[TEST].set_level(true);
    rig.tick(1);
    rig.pins.buttons[TEST].set_level(false);
    assert!(rig.siren_sounding());

    rig.tick(10);
    assert!(rig.pins.leds[0].level(), "alarm LED toggles after 100 ms");

    // Code 1100 on A..D, then Enter.
    rig.pins.buttons[2].set_level(true);
    rig.pins.buttons[3].set_level(true);
    rig.pins.buttons[ENTER].set_level(true);
    rig.tick(1);

    assert_eq!(rig.app.state(), StateId::Disarmed);
    assert!(!rig.siren_sounding());
    assert!(!rig.pins.leds[0].level());
}

#[test]
fn gas_detector_line_low_arms() {
    let mut rig = Rig::new();
    rig.pins.gas_line.set_level(false);
    rig.tick(1);
    assert_eq!(rig.app.state(), StateId::Armed);
    assert!(rig.siren_sounding());
}

#[test]
fn serial_disarm_on_sim_console() {
    let mut rig = Rig::new();
    rig.pins.buttons[TEST].set_level(true);
    rig.tick(1);
    rig.pins.buttons[TEST].set_level(false);

    rig.serial.push_input(b"41100");
    rig.tick(2);

    let out = rig.serial.take_output();
    assert!(out.ends_with(b"****\r\nThe code is correct\r\n\r\n"));
    assert_eq!(rig.app.state(), StateId::Disarmed);
    assert!(!rig.siren_sounding());
}

#[test]
fn stuck_output_pin_does_not_stop_the_loop() {
    let mut rig = Rig::new();
    rig.pins.siren.set_faulty(true);

    rig.pins.buttons[TEST].set_level(true);
    rig.tick(3);

    // Armed even though the siren write failed.
    assert_eq!(rig.app.state(), StateId::Armed);
    assert!(!rig.siren_sounding());
    assert_eq!(rig.app.context().total_ticks, 3);
}
