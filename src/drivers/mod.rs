//! Actuator drivers and the task watchdog.

pub mod relay;
pub mod servo;
pub mod watchdog;
