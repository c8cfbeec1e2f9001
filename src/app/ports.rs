//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DispenserService (domain)
//! ```
//!
//! Driven adapters (drivers, serial sinks) implement these traits.  The
//! [`DispenserService`](super::service::DispenserService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, SensorError};
use crate::products::{ServoId, StockSensorId};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port.  Every read is side-effect free and non-blocking.
pub trait SensorPort {
    /// `true` when the light barrier is interrupted (stock present).
    fn stock_present(&mut self, sensor: StockSensorId) -> Result<bool, SensorError>;

    /// `true` when the float switch reports liquid in the tank.
    fn tank_has_liquid(&mut self) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: raw device primitives.  Product-level begin/end
/// sequencing lives in [`ActuatorRegistry`](crate::registry::ActuatorRegistry).
pub trait ActuatorPort {
    /// Move a servo valve to `angle` degrees.
    fn set_servo_angle(&mut self, servo: ServoId, angle: u8) -> Result<(), ActuatorError>;

    /// Switch the water pump relay.
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Switch the agitator motor relay.
    fn set_agitator(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Drive every actuator to its idle position (safe shutdown).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → serial / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial line,
/// log output, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Command source port (driven adapter: transport → domain)
// ───────────────────────────────────────────────────────────────

/// Line-oriented command channel.  Returns at most one complete line per
/// call and never blocks; `None` means nothing is pending.
pub trait CommandSource {
    fn poll_line(&mut self) -> Option<String>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Config JSON failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
