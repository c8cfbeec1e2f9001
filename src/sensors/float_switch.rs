//! Water tank float switch.
//!
//! Wired between the GPIO and ground with the internal pull-up enabled:
//! the float closes the contact (LOW) while water is present.

use embedded_hal::digital::InputPin;

use crate::error::SensorError;

pub struct FloatSwitch<P: InputPin> {
    pin: P,
}

impl<P: InputPin> FloatSwitch<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn has_liquid(&mut self) -> Result<bool, SensorError> {
        self.pin.is_low().map_err(|_| SensorError::GpioReadFailed)
    }
}
