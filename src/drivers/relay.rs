//! On/off relay driver.
//!
//! Used for the water pump and the agitator DC motor.  Active HIGH.  The
//! driver only remembers the last state it managed to write.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> RelayDriver<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    pub fn turn_on(&mut self) -> Result<(), ActuatorError> {
        self.set(true)
    }

    pub fn turn_off(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
