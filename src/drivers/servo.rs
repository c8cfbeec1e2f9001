//! Hobby servo valve driver.
//!
//! Positions a standard 50 Hz servo by pulse width: 500 µs at 0° up to
//! 2500 µs at 180°.  Generic over any `embedded-hal` PWM channel, so the
//! same driver runs on an LEDC channel on the ESP32 and on a simulated
//! channel on the host.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;
use crate::pins::{SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US, SERVO_PERIOD_US};

pub const MAX_ANGLE: u8 = 180;

/// Pulse width in microseconds for `angle` (clamped to 0–180°).
pub fn pulse_width_us(angle: u8) -> u16 {
    let angle = u32::from(angle.min(MAX_ANGLE));
    let span = u32::from(SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US);
    SERVO_MIN_PULSE_US + (angle * span / u32::from(MAX_ANGLE)) as u16
}

pub struct ServoDriver<P: SetDutyCycle> {
    pwm: P,
    angle: Option<u8>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    /// Command a new position.  Out-of-range angles are clamped.
    pub fn set_angle(&mut self, angle: u8) -> Result<(), ActuatorError> {
        let angle = angle.min(MAX_ANGLE);
        self.pwm
            .set_duty_cycle_fraction(pulse_width_us(angle), SERVO_PERIOD_US)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.angle = Some(angle);
        Ok(())
    }

    /// Last successfully commanded angle, `None` before the first write.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }
}
