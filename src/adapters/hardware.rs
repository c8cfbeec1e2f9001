//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns every servo, relay and sensor driver and exposes them through
//! [`SensorPort`] and [`ActuatorPort`].  Generic over the `embedded-hal`
//! pin types so the same adapter runs on ESP-IDF `PinDriver`/`LedcDriver`
//! handles and on the simulated pins in [`super::sim`].

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::{info, warn};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::RelayDriver;
use crate::drivers::servo::ServoDriver;
use crate::error::{ActuatorError, Error, SensorError};
use crate::products::{ServoId, StockSensorId};
use crate::sensors::{FloatSwitch, StockSensor};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<Pwm, Out, In>
where
    Pwm: SetDutyCycle,
    Out: OutputPin,
    In: InputPin,
{
    /// Indexed by `ServoId as usize`.
    servos: [ServoDriver<Pwm>; ServoId::COUNT],
    /// Closed angle per servo, used by `all_off`.
    rest_angles: [u8; ServoId::COUNT],
    pump: RelayDriver<Out>,
    agitator: RelayDriver<Out>,
    /// Indexed by `StockSensorId as usize`.
    stock: [StockSensor<Out, In>; StockSensorId::COUNT],
    tank: FloatSwitch<In>,
}

impl<Pwm, Out, In> HardwareAdapter<Pwm, Out, In>
where
    Pwm: SetDutyCycle,
    Out: OutputPin,
    In: InputPin,
{
    pub fn new(
        servos: [ServoDriver<Pwm>; ServoId::COUNT],
        rest_angles: [u8; ServoId::COUNT],
        pump: RelayDriver<Out>,
        agitator: RelayDriver<Out>,
        stock: [StockSensor<Out, In>; StockSensorId::COUNT],
        tank: FloatSwitch<In>,
    ) -> Self {
        Self {
            servos,
            rest_angles,
            pump,
            agitator,
            stock,
            tank,
        }
    }

    /// Switch every stock laser on.  Call once at boot.
    pub fn enable_stock_sensors(&mut self) -> Result<(), Error> {
        for sensor in &mut self.stock {
            sensor.set_laser(true)?;
        }
        info!("hardware: {} stock lasers on", self.stock.len());
        Ok(())
    }

    pub fn servo_angle(&self, servo: ServoId) -> Option<u8> {
        self.servos[servo as usize].angle()
    }

    pub fn is_pump_on(&self) -> bool {
        self.pump.is_on()
    }

    pub fn is_agitator_on(&self) -> bool {
        self.agitator.is_on()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<Pwm, Out, In> SensorPort for HardwareAdapter<Pwm, Out, In>
where
    Pwm: SetDutyCycle,
    Out: OutputPin,
    In: InputPin,
{
    fn stock_present(&mut self, sensor: StockSensorId) -> Result<bool, SensorError> {
        self.stock[sensor as usize].is_stock_present()
    }

    fn tank_has_liquid(&mut self) -> Result<bool, SensorError> {
        self.tank.has_liquid()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<Pwm, Out, In> ActuatorPort for HardwareAdapter<Pwm, Out, In>
where
    Pwm: SetDutyCycle,
    Out: OutputPin,
    In: InputPin,
{
    fn set_servo_angle(&mut self, servo: ServoId, angle: u8) -> Result<(), ActuatorError> {
        self.servos[servo as usize].set_angle(angle)
    }

    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.pump.set(on)
    }

    fn set_agitator(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.agitator.set(on)
    }

    fn all_off(&mut self) {
        for (servo, &rest) in self.servos.iter_mut().zip(&self.rest_angles) {
            if let Err(e) = servo.set_angle(rest) {
                warn!("all_off: servo: {}", e);
            }
        }
        if let Err(e) = self.pump.turn_off() {
            warn!("all_off: pump: {}", e);
        }
        if let Err(e) = self.agitator.turn_off() {
            warn!("all_off: agitator: {}", e);
        }
    }
}
