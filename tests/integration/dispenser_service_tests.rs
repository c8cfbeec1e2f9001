//! Integration tests for the serial line → FSM → actuators pipeline.
//!
//! These run on the host (x86_64) and drive `DispenserService` through its
//! public API only, with mock ports on every side.

use cafe_dispenser::app::events::AppEvent;
use cafe_dispenser::fsm::StateId;
use cafe_dispenser::products::{ServoId, StockSensorId};
use cafe_dispenser::telemetry::Level;
use cafe_dispenser::{DispenserConfig, DispenserService};

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink, ScriptSource};

/// Harness with telemetry pushed far out so it never fires by accident.
struct Rig {
    app: DispenserService,
    hw: MockHardware,
    src: ScriptSource,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(DispenserConfig {
            telemetry_interval_ms: 600_000,
            ..DispenserConfig::default()
        })
    }

    fn with_config(config: DispenserConfig) -> Self {
        let mut app = DispenserService::new(&config);
        let mut hw = MockHardware::stocked();
        let mut sink = RecordingSink::default();
        app.start(&mut hw, &mut sink);
        hw.calls.clear();
        sink.clear();
        Self {
            app,
            hw,
            src: ScriptSource::default(),
            sink,
        }
    }

    fn send(&mut self, now_ms: u64, line: &str) {
        self.src.push(line);
        self.tick(now_ms);
    }

    fn tick(&mut self, now_ms: u64) {
        self.app
            .tick(now_ms, &mut self.hw, &mut self.src, &mut self.sink);
    }
}

// ── Admitted dispense runs to completion ─────────────────────

#[test]
fn sugar_dispense_opens_then_closes_after_duration() {
    let mut rig = Rig::new();

    rig.send(10, "S2.5");
    assert_eq!(rig.app.state(), StateId::Executing);
    assert_eq!(
        rig.sink.replies(),
        vec!["SUCCESS: Sugar command received: 2.50s"]
    );
    assert_eq!(
        rig.hw.calls,
        vec![
            ActuatorCall::Servo { servo: ServoId::Sugar, angle: 90 },
            ActuatorCall::Agitator(true),
        ]
    );

    // One millisecond short of the deadline: still running.
    rig.tick(2509);
    assert!(rig.app.is_executing());
    assert_eq!(rig.hw.calls.len(), 2, "no actuator change mid-dispense");

    rig.tick(2510);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.app.is_executing());
    assert_eq!(rig.hw.servo_angle(ServoId::Sugar), Some(0));
    assert!(!rig.hw.agitator_on());
    assert_eq!(
        rig.sink.replies().last().map(String::as_str),
        Some("SUCCESS: Sugar dispensing completed")
    );

    let stats = rig.app.stats();
    assert_eq!(stats.admitted, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.rejected, 0);
}

#[test]
fn water_drives_the_pump_and_reports_pumping() {
    let mut rig = Rig::new();

    rig.send(0, "w 1");
    assert!(rig.hw.pump_on());
    assert!(rig.hw.agitator_on());

    rig.tick(1000);
    assert!(!rig.hw.pump_on());
    assert_eq!(
        rig.sink.replies().last().map(String::as_str),
        Some("SUCCESS: Water pumping completed")
    );
}

#[test]
fn cup_never_runs_the_agitator() {
    let mut rig = Rig::new();

    rig.send(0, "U0.5");
    assert!(rig.app.is_executing());
    assert_eq!(rig.hw.servo_angle(ServoId::Cup), Some(90));
    assert!(
        !rig.hw.calls.contains(&ActuatorCall::Agitator(true)),
        "cup dispensing must not touch the agitator"
    );

    rig.tick(500);
    assert_eq!(rig.hw.servo_angle(ServoId::Cup), Some(0));
    assert_eq!(rig.app.state(), StateId::Idle);
}

// ── Out of stock ─────────────────────────────────────────────

#[test]
fn empty_hopper_rejects_without_touching_actuators() {
    let mut rig = Rig::new();
    rig.hw.set_stock(StockSensorId::Sugar, false);

    rig.send(0, "S2.5");
    assert_eq!(
        rig.sink.replies(),
        vec!["ERROR: Sugar stock is too low to dispense!"]
    );
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.app.stats().rejected, 1);
}

#[test]
fn dry_tank_rejects_water() {
    let mut rig = Rig::new();
    rig.hw.tank = false;

    rig.send(0, "W5");
    assert_eq!(
        rig.sink.replies(),
        vec!["ERROR: Water tank is too low to dispense!"]
    );
    assert!(!rig.hw.pump_on());
}

#[test]
fn sensor_fault_counts_as_empty() {
    let mut rig = Rig::new();
    rig.hw.sensor_fault = true;

    rig.send(0, "C2");
    assert_eq!(
        rig.sink.errors(),
        vec!["Coffee stock is too low to dispense!"]
    );
    assert!(!rig.app.is_executing());

    // Cup has no sensor and is unaffected.
    rig.send(10, "U1");
    assert!(rig.app.is_executing());
}

// ── Duration bounds ──────────────────────────────────────────

#[test]
fn too_short_duration_is_rejected() {
    let mut rig = Rig::new();

    rig.send(0, "W0.005");
    let errors = rig.sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].starts_with("duration too short"),
        "unexpected reply {:?}",
        errors[0]
    );
    assert!(!rig.app.is_executing());
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn configured_ceiling_is_enforced_per_product() {
    let mut rig = Rig::new();

    rig.send(0, "S10.5");
    assert_eq!(
        rig.sink.errors(),
        vec!["duration too long for Sugar (maximum: 10.00s)"]
    );

    // Coffee has no ceiling by default.
    rig.send(10, "C45");
    assert!(rig.app.is_executing());
}

#[test]
fn duration_check_runs_before_stock_check() {
    let mut rig = Rig::new();
    rig.hw.set_stock(StockSensorId::Sugar, false);

    rig.send(0, "S0");
    let errors = rig.sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("duration too short"));
}

// ── Unknown or blank input ───────────────────────────────────

#[test]
fn unknown_prefix_reports_raw_text() {
    let mut rig = Rig::new();

    rig.send(0, "X3");
    assert_eq!(rig.sink.replies(), vec!["ERROR: unknown command: X3"]);
    assert_eq!(rig.hw.sensor_reads, 0, "unknown commands never query stock");
}

#[test]
fn blank_line_is_ignored_silently() {
    let mut rig = Rig::new();

    rig.send(0, "   ");
    rig.send(1, "");
    assert_eq!(rig.sink.reply_count(), 0);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.app.stats().rejected, 0);
}

#[test]
fn custom_prefix_from_config() {
    let mut config = DispenserConfig {
        telemetry_interval_ms: 600_000,
        ..DispenserConfig::default()
    };
    config.products[cafe_dispenser::products::Product::Cup as usize].prefix = 'K';

    let mut rig = Rig::with_config(config);
    rig.send(0, "k1");
    assert_eq!(
        rig.sink.replies(),
        vec!["SUCCESS: Cup command received: 1.00s"]
    );

    rig.tick(1000);
    rig.send(1001, "U1");
    assert_eq!(
        rig.sink.replies().last().map(String::as_str),
        Some("ERROR: unknown command: U1")
    );
}

// ── Busy slot drops input ────────────────────────────────────

#[test]
fn command_during_execution_is_consumed_and_dropped() {
    let mut rig = Rig::new();

    rig.send(100, "S3");
    let calls_after_admit = rig.hw.calls.clone();
    let reads_after_admit = rig.hw.sensor_reads;
    assert_eq!(rig.sink.reply_count(), 1);

    rig.send(1100, "C2");
    assert_eq!(rig.src.taken, 2, "second line must be read off the transport");
    assert!(rig.src.is_empty());
    assert_eq!(rig.sink.reply_count(), 1, "no reply for a dropped command");
    assert_eq!(rig.hw.calls, calls_after_admit, "no actuator effect");
    assert_eq!(rig.hw.sensor_reads, reads_after_admit, "stock not queried while busy");
    assert!(rig.sink.events.contains(&AppEvent::CommandDropped { raw: "C2".into() }));

    rig.tick(3099);
    assert!(rig.app.is_executing());
    rig.tick(3100);
    assert!(!rig.app.is_executing());
    assert_eq!(
        rig.sink.replies(),
        vec![
            "SUCCESS: Sugar command received: 3.00s",
            "SUCCESS: Sugar dispensing completed",
        ]
    );
    assert_eq!(rig.hw.servo_angle(ServoId::Coffee), None, "coffee never opened");

    let stats = rig.app.stats();
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.admitted, 1);
}

#[test]
fn next_command_is_accepted_after_completion() {
    let mut rig = Rig::new();

    rig.send(0, "G1");
    rig.tick(1000);
    rig.send(1001, "I1");
    assert!(rig.app.is_executing());
    assert_eq!(rig.hw.servo_angle(ServoId::GreenTea), Some(0));
    assert_eq!(rig.hw.servo_angle(ServoId::IcedTea), Some(90));
}

// ── Exclusivity ──────────────────────────────────────────────

#[test]
fn at_most_one_primary_actuator_is_ever_open() {
    let mut rig = Rig::new();
    let script = ["S1", "W1", "C1", "", "X9", "I1", "G1", "U1", "W0.5"];

    let mut now = 0;
    for line in script.iter().cycle().take(40) {
        rig.send(now, line);
        now += 250;

        let mut open = Vec::new();
        for servo in [
            ServoId::Sugar,
            ServoId::Coffee,
            ServoId::IcedTea,
            ServoId::GreenTea,
            ServoId::Cup,
        ] {
            if rig.hw.servo_angle(servo) == Some(90) {
                open.push(format!("{servo:?}"));
            }
        }
        if rig.hw.pump_on() {
            open.push("Pump".into());
        }
        assert!(open.len() <= 1, "several actuators open at {now}: {open:?}");
        assert_eq!(open.len() == 1, rig.app.is_executing());
    }
}

// ── Telemetry ────────────────────────────────────────────────

#[test]
fn telemetry_keeps_its_cadence_while_executing() {
    let mut rig = Rig::with_config(DispenserConfig::default());
    rig.hw.set_stock(StockSensorId::Coffee, false);

    rig.src.push("W5");
    for now in (0..=5000).step_by(100) {
        rig.tick(now);
    }

    assert_eq!(rig.sink.telemetry_count(), 5);
    assert_eq!(rig.app.stats().completed, 1);

    let Some(AppEvent::Telemetry(snapshot)) = rig
        .sink
        .events
        .iter()
        .find(|e| matches!(e, AppEvent::Telemetry(_)))
    else {
        panic!("no telemetry emitted");
    };
    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.get("coffee"), Some(Level::Low));
    assert_eq!(snapshot.get("water"), Some(Level::High));
    assert_eq!(snapshot.get("cup"), None);
}

#[test]
fn start_rests_every_actuator_and_reports_idle() {
    let config = DispenserConfig::default();
    let mut app = DispenserService::new(&config);
    let mut hw = MockHardware::stocked();
    let mut sink = RecordingSink::default();

    app.start(&mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::AllOff));
    assert_eq!(sink.events, vec![AppEvent::Started(StateId::Idle)]);
}
