//! Sensor drivers.
//!
//! Both drivers are generic over `embedded-hal` digital pins and report
//! through [`SensorError`](crate::error::SensorError); the
//! [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter) owns
//! them and exposes them through the `SensorPort`.

pub mod float_switch;
pub mod stock;

pub use float_switch::FloatSwitch;
pub use stock::StockSensor;
