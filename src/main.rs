//! Dispenser firmware entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      SerialEventSink     LineReader<Uart>     │
//! │  (Sensor+Actuator)    (EventSink)         (CommandSource)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            DispenserService (pure logic)               │    │
//! │  │  Parser · Validator · FSM · Registry · Telemetry       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_hal::delay::{FreeRtos, NON_BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, IOPin, Input, OutputPin as _, PinDriver, Pull};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::{self, UartDriver};
use esp_idf_hal::units::Hertz;

use cafe_dispenser::adapters::hardware::HardwareAdapter;
use cafe_dispenser::adapters::serial_sink::SerialEventSink;
use cafe_dispenser::adapters::time::MonotonicClock;
use cafe_dispenser::drivers::relay::RelayDriver;
use cafe_dispenser::drivers::servo::ServoDriver;
use cafe_dispenser::drivers::watchdog::Watchdog;
use cafe_dispenser::registry::ActuatorRegistry;
use cafe_dispenser::sensors::{FloatSwitch, StockSensor};
use cafe_dispenser::serial::{LineReader, Transport};
use cafe_dispenser::{DispenserConfig, DispenserService, pins};

// ── UART transport ────────────────────────────────────────────
//
// `UartDriver` reads and writes through `&self`, so the reader and the
// sink can each hold a handle to the same port.

struct UartTransport<'a>(&'a UartDriver<'static>);

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.0.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.0.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        // The driver's TX ring buffer drains in the background.
        Ok(())
    }
}

// ── Main ──────────────────────────────────────────────────────

const _: () = assert!(pins::SERVO_PWM_RESOLUTION_BITS == 14, "LEDC timer below uses Bits14");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Cafe Dispenser v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // No runtime persistence: the compiled-in defaults are the config.
    let config = DispenserConfig::default();
    config.validate().map_err(cafe_dispenser::Error::from)?;

    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let clock = MonotonicClock::new();
    let p = Peripherals::take()?;
    let io = p.pins;

    // ── 2. Servo valves (LEDC, 50 Hz) ─────────────────────────
    let servo_timer = LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(pins::SERVO_PWM_FREQ_HZ))
            .resolution(Resolution::Bits14),
    )?;
    // Order matches `ServoId`.
    let servos = [
        ServoDriver::new(LedcDriver::new(p.ledc.channel0, &servo_timer, io.gpio5)?),
        ServoDriver::new(LedcDriver::new(p.ledc.channel1, &servo_timer, io.gpio6)?),
        ServoDriver::new(LedcDriver::new(p.ledc.channel2, &servo_timer, io.gpio11)?),
        ServoDriver::new(LedcDriver::new(p.ledc.channel3, &servo_timer, io.gpio14)?),
        ServoDriver::new(LedcDriver::new(p.ledc.channel4, &servo_timer, io.gpio3)?),
    ];
    let rest_angles = ActuatorRegistry::new(&config).rest_angles();

    // ── 3. Relays ─────────────────────────────────────────────
    let pump = RelayDriver::new(PinDriver::output(io.gpio4.downgrade_output())?);
    let agitator = RelayDriver::new(PinDriver::output(io.gpio17.downgrade_output())?);

    // ── 4. Stock sensors + float switch ───────────────────────
    let input = |pin: AnyIOPin, pull: Pull| -> Result<PinDriver<'static, AnyIOPin, Input>> {
        let mut drv = PinDriver::input(pin)?;
        drv.set_pull(pull)?;
        Ok(drv)
    };
    // Order matches `StockSensorId`.
    let stock = [
        StockSensor::new(
            PinDriver::output(io.gpio7.downgrade_output())?,
            input(io.gpio8.downgrade(), Pull::Floating)?,
        ),
        StockSensor::new(
            PinDriver::output(io.gpio9.downgrade_output())?,
            input(io.gpio10.downgrade(), Pull::Floating)?,
        ),
        StockSensor::new(
            PinDriver::output(io.gpio12.downgrade_output())?,
            input(io.gpio13.downgrade(), Pull::Floating)?,
        ),
        StockSensor::new(
            PinDriver::output(io.gpio15.downgrade_output())?,
            input(io.gpio16.downgrade(), Pull::Floating)?,
        ),
    ];
    let tank = FloatSwitch::new(input(io.gpio2.downgrade(), Pull::Up)?);

    let mut hw = HardwareAdapter::new(servos, rest_angles, pump, agitator, stock, tank);
    hw.enable_stock_sensors()?;

    // ── 5. Serial link ────────────────────────────────────────
    let uart = UartDriver::new(
        p.uart0,
        io.gpio43,
        io.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart::config::Config::new().baudrate(Hertz(config.baud_rate)),
    )?;
    let mut source = LineReader::new(UartTransport(&uart));
    let mut sink = SerialEventSink::new(UartTransport(&uart));

    // ── 6. App service ────────────────────────────────────────
    let mut app = DispenserService::new(&config);
    app.start(&mut hw, &mut sink);

    info!(
        "System ready on UART0 @ {} baud. Entering dispatch loop.",
        config.baud_rate
    );

    // ── 7. Dispatch loop ──────────────────────────────────────
    loop {
        app.tick(clock.uptime_ms(), &mut hw, &mut source, &mut sink);
        watchdog.feed();
        // Yield to the idle task so its own watchdog stays fed.
        FreeRtos::delay_ms(1);
    }
}
