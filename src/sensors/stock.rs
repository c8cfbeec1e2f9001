//! Laser light-barrier stock sensor.
//!
//! A laser diode shines across the hopper throat onto a digital light
//! sensor.  While product sits in the throat the beam is blocked and the
//! sensor reads LOW; an empty hopper lets the light through and the sensor
//! reads HIGH.
//!
//! The laser is switched on once at boot and left on.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

pub struct StockSensor<L: OutputPin, S: InputPin> {
    laser: L,
    sensor: S,
    laser_on: bool,
}

impl<L: OutputPin, S: InputPin> StockSensor<L, S> {
    /// Takes ownership of both pins.  The laser starts off.
    pub fn new(laser: L, sensor: S) -> Self {
        Self {
            laser,
            sensor,
            laser_on: false,
        }
    }

    pub fn set_laser(&mut self, on: bool) -> Result<(), SensorError> {
        let res = if on {
            self.laser.set_high()
        } else {
            self.laser.set_low()
        };
        res.map_err(|_| SensorError::LaserFailed)?;
        self.laser_on = on;
        Ok(())
    }

    pub fn is_laser_on(&self) -> bool {
        self.laser_on
    }

    /// `true` when the beam is blocked.  With the laser off the reading is
    /// meaningless and treated as empty.
    pub fn is_stock_present(&mut self) -> Result<bool, SensorError> {
        if !self.laser_on {
            return Ok(false);
        }
        self.sensor
            .is_low()
            .map_err(|_| SensorError::GpioReadFailed)
    }
}
