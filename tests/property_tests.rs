//! Property tests for the parser, the line decoder and the dispatch loop.
//!
//! Runs on host (x86_64) only; proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use cafe_dispenser::app::commands::{CommandKind, CommandParser, secs_to_ms};
use cafe_dispenser::app::events::{AppEvent, Reply};
use cafe_dispenser::app::ports::{ActuatorPort, CommandSource, EventSink, SensorPort};
use cafe_dispenser::error::{ActuatorError, SensorError};
use cafe_dispenser::products::{Product, ServoId, StockSensorId};
use cafe_dispenser::serial::{LineDecoder, MAX_LINE_LEN};
use cafe_dispenser::{DispenserConfig, DispenserService};
use proptest::prelude::*;

// ── Parser ────────────────────────────────────────────────────

proptest! {
    /// Parsing is a pure function of its input and never panics.
    #[test]
    fn parse_is_pure(line in ".{0,64}") {
        let parser = CommandParser::default();
        let a = parser.parse(&line);
        let b = parser.parse(&line);
        prop_assert_eq!(a, b);
    }

    /// A known prefix followed by a plain decimal always round-trips its
    /// duration to the nearest millisecond.
    #[test]
    fn duration_round_trips(
        idx in 0usize..Product::COUNT,
        millis in 0u32..=600_000u32,
        lower in any::<bool>(),
    ) {
        let product = Product::ALL[idx];
        let mut prefix = product.spec().default_prefix;
        if lower {
            prefix = prefix.to_ascii_lowercase();
        }
        let line = format!("{}{}.{:03}", prefix, millis / 1000, millis % 1000);

        let cmd = CommandParser::default().parse(&line);
        prop_assert_eq!(cmd.kind, CommandKind::Dispense(product));
        // f32 keeps 7 significant digits; allow one millisecond of slack.
        let ms = cmd.duration_ms();
        prop_assert!(ms.abs_diff(u64::from(millis)) <= 1, "{} parsed as {} ms", line, ms);
    }

    #[test]
    fn secs_to_ms_clamps_non_positive(secs in any::<f32>()) {
        let ms = secs_to_ms(secs);
        if !(secs > 0.0) {
            prop_assert_eq!(ms, 0);
        }
    }
}

// ── Line decoder ──────────────────────────────────────────────

proptest! {
    /// Whatever the byte stream, every yielded line fits the buffer and
    /// contains no terminator.
    #[test]
    fn decoder_lines_are_bounded(bytes in proptest::collection::vec(any::<u8>(), 0..=512)) {
        let mut dec = LineDecoder::new();
        for b in bytes {
            if let Some(line) = dec.push(b) {
                prop_assert!(!line.contains('\n'));
                prop_assert!(!line.contains('\r'));
                prop_assert!(line.len() <= MAX_LINE_LEN * 3, "lossy UTF-8 expands at most 3x");
            }
            prop_assert!(dec.pending() <= MAX_LINE_LEN);
        }
    }
}

// ── Dispatch loop ─────────────────────────────────────────────

/// Tracks which primary actuators are open and fails on overlap.
#[derive(Default)]
struct Exclusive {
    servos_open: [bool; ServoId::COUNT],
    pump: bool,
    max_open: usize,
    stock: [bool; StockSensorId::COUNT],
    tank: bool,
}

impl Exclusive {
    fn open_count(&self) -> usize {
        self.servos_open.iter().filter(|&&o| o).count() + usize::from(self.pump)
    }
}

impl SensorPort for Exclusive {
    fn stock_present(&mut self, sensor: StockSensorId) -> Result<bool, SensorError> {
        Ok(self.stock[sensor as usize])
    }

    fn tank_has_liquid(&mut self) -> Result<bool, SensorError> {
        Ok(self.tank)
    }
}

impl ActuatorPort for Exclusive {
    fn set_servo_angle(&mut self, servo: ServoId, angle: u8) -> Result<(), ActuatorError> {
        self.servos_open[servo as usize] = angle != 0;
        self.max_open = self.max_open.max(self.open_count());
        Ok(())
    }

    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.pump = on;
        self.max_open = self.max_open.max(self.open_count());
        Ok(())
    }

    fn set_agitator(&mut self, _on: bool) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn all_off(&mut self) {
        self.servos_open = [false; ServoId::COUNT];
        self.pump = false;
    }
}

struct One(Option<String>);

impl CommandSource for One {
    fn poll_line(&mut self) -> Option<String> {
        self.0.take()
    }
}

#[derive(Default)]
struct Count {
    success: usize,
    error: usize,
}

impl EventSink for Count {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reply(Reply::Success(_)) => self.success += 1,
            AppEvent::Reply(Reply::Error(_)) => self.error += 1,
            _ => {}
        }
    }
}

fn arb_line() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(None),
        4 => ("[SWCIGUswcigu]", 0u32..3000u32)
            .prop_map(|(p, ms)| Some(format!("{}{}", p, f64::from(ms) / 1000.0))),
        1 => "[A-Za-z ]{0,4}[0-9.]{0,5}".prop_map(Some),
    ]
}

proptest! {
    /// Under any mix of input, stock levels and tick spacing, at most one
    /// primary actuator is open and every admitted command is answered
    /// exactly twice (received, completed).
    #[test]
    fn single_slot_holds_under_random_traffic(
        steps in proptest::collection::vec((arb_line(), 1u64..400u64), 1..=120),
        stock in proptest::array::uniform4(any::<bool>()),
        tank in any::<bool>(),
    ) {
        let config = DispenserConfig {
            telemetry_interval_ms: 250,
            ..DispenserConfig::default()
        };
        let mut app = DispenserService::new(&config);
        let mut hw = Exclusive { stock, tank, ..Exclusive::default() };
        let mut sink = Count::default();
        app.start(&mut hw, &mut sink);

        let mut now = 0u64;
        for (line, gap) in steps {
            now += gap;
            app.tick(now, &mut hw, &mut One(line), &mut sink);
            prop_assert!(hw.open_count() <= 1);
            prop_assert_eq!(hw.open_count() == 1, app.is_executing());
        }

        // Drain whatever is still running; junk lines can ask for up to
        // 99999 s on an unbounded product.
        now += 100_000_000;
        app.tick(now, &mut hw, &mut One(None), &mut sink);
        prop_assert!(!app.is_executing());
        prop_assert_eq!(hw.open_count(), 0);
        prop_assert!(hw.max_open <= 1);

        let stats = app.stats();
        prop_assert_eq!(stats.admitted, stats.completed);
        prop_assert_eq!(sink.success as u64, stats.admitted * 2);
        prop_assert_eq!(sink.error as u64, stats.rejected);
    }
}

proptest! {
    /// An admitted operation of requested duration D is still running one
    /// millisecond before `round(D * 1000)` has elapsed and finished exactly
    /// when it has, whatever the admission time.
    #[test]
    fn completion_lands_on_the_rounded_deadline(
        product in prop::sample::select(vec![
            Product::Coffee,
            Product::IcedTea,
            Product::GreenTea,
            Product::Cup,
        ]),
        millis in 20u32..=120_000u32,
        start in 0u64..10_000_000u64,
    ) {
        let config = DispenserConfig {
            telemetry_interval_ms: 600_000,
            ..DispenserConfig::default()
        };
        let mut app = DispenserService::new(&config);
        let mut hw = Exclusive {
            stock: [true; StockSensorId::COUNT],
            tank: true,
            ..Exclusive::default()
        };
        let mut sink = Count::default();
        app.start(&mut hw, &mut sink);

        let line = format!(
            "{}{}.{:03}",
            product.spec().default_prefix,
            millis / 1000,
            millis % 1000
        );
        let deadline = CommandParser::default().parse(&line).duration_ms();

        app.tick(start, &mut hw, &mut One(Some(line)), &mut sink);
        prop_assert!(app.is_executing());

        app.tick(start + deadline - 1, &mut hw, &mut One(None), &mut sink);
        prop_assert!(app.is_executing(), "finished early at {} of {} ms", deadline - 1, deadline);

        app.tick(start + deadline, &mut hw, &mut One(None), &mut sink);
        prop_assert!(!app.is_executing(), "still running at {} ms", deadline);
        prop_assert_eq!(hw.open_count(), 0);
        prop_assert_eq!(app.stats().completed, 1);
    }
}
