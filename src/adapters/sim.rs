//! Simulated board for the host.
//!
//! [`SimPin`] and [`SimPwm`] implement the `embedded-hal` traits over
//! shared cells, so the real drivers and [`HardwareAdapter`] run unchanged
//! while a [`SimBoard`] handle keeps a view of every wire: tests and the
//! simulator flip sensor inputs and inspect actuator outputs through it.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use super::hardware::HardwareAdapter;
use crate::drivers::relay::RelayDriver;
use crate::drivers::servo::ServoDriver;
use crate::pins::SERVO_PERIOD_US;
use crate::products::{ServoId, StockSensorId};
use crate::sensors::{FloatSwitch, StockSensor};

/// A GPIO line.  `true` = HIGH.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<Cell<bool>>);

impl SimPin {
    pub fn new(high: bool) -> Self {
        Self(Rc::new(Cell::new(high)))
    }

    pub fn is_set_high(&self) -> bool {
        self.0.get()
    }

    pub fn drive(&self, high: bool) {
        self.0.set(high);
    }
}

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

/// A PWM channel whose full scale is one servo period in microseconds,
/// so the stored duty reads directly as a pulse width.
#[derive(Debug, Clone, Default)]
pub struct SimPwm(Rc<Cell<u16>>);

impl SimPwm {
    pub fn duty(&self) -> u16 {
        self.0.get()
    }
}

impl pwm::ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        SERVO_PERIOD_US
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.0.set(duty);
        Ok(())
    }
}

pub type SimHardware = HardwareAdapter<SimPwm, SimPin, SimPin>;

/// Handles to every simulated wire.
#[derive(Debug, Clone)]
pub struct SimBoard {
    servos: [SimPwm; ServoId::COUNT],
    pump: SimPin,
    agitator: SimPin,
    lasers: [SimPin; StockSensorId::COUNT],
    light: [SimPin; StockSensorId::COUNT],
    float: SimPin,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Every hopper and the tank start empty (inputs idle HIGH).
    pub fn new() -> Self {
        Self {
            servos: Default::default(),
            pump: SimPin::new(false),
            agitator: SimPin::new(false),
            lasers: Default::default(),
            light: core::array::from_fn(|_| SimPin::new(true)),
            float: SimPin::new(true),
        }
    }

    /// Build an adapter wired to this board.
    pub fn hardware(&self, rest_angles: [u8; ServoId::COUNT]) -> SimHardware {
        HardwareAdapter::new(
            self.servos.clone().map(ServoDriver::new),
            rest_angles,
            RelayDriver::new(self.pump.clone()),
            RelayDriver::new(self.agitator.clone()),
            core::array::from_fn(|i| StockSensor::new(self.lasers[i].clone(), self.light[i].clone())),
            FloatSwitch::new(self.float.clone()),
        )
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Block (stock present) or clear the light barrier.
    pub fn set_stock(&self, sensor: StockSensorId, present: bool) {
        self.light[sensor as usize].drive(!present);
    }

    pub fn set_all_stock(&self, present: bool) {
        for pin in &self.light {
            pin.drive(!present);
        }
    }

    pub fn set_tank(&self, has_water: bool) {
        self.float.drive(!has_water);
    }

    // ── Outputs ───────────────────────────────────────────────

    /// Current pulse width of a servo in microseconds (0 = never driven).
    pub fn servo_pulse_us(&self, servo: ServoId) -> u16 {
        self.servos[servo as usize].duty()
    }

    pub fn pump_on(&self) -> bool {
        self.pump.is_set_high()
    }

    pub fn agitator_on(&self) -> bool {
        self.agitator.is_set_high()
    }

    pub fn laser_on(&self, sensor: StockSensorId) -> bool {
        self.lasers[sensor as usize].is_set_high()
    }
}
