//! Unified error types for the dispenser firmware.
//!
//! Two families live here:
//!
//! - [`Error`] and its `Copy` sub-enums cover hardware and configuration
//!   failures.  None of them is fatal: the dispatch loop logs and carries on.
//! - [`DispenseError`] is the rejection taxonomy for a single serial command.
//!   Its `Display` text is exactly what follows `ERROR: ` on the wire.

use core::fmt;

use crate::app::ports::ConfigError;
use crate::products::Product;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible hardware or setup operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// The laser emitter of a stock sensor could not be switched.
    LaserFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::LaserFailed => write!(f, "laser emitter failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Command rejections
// ---------------------------------------------------------------------------

/// Why a command line was rejected during the Idle-tick admit step.
///
/// Every variant is terminal for its input line: the line is reported and
/// discarded, and the machine stays Idle.
#[derive(Debug, Clone, PartialEq)]
pub enum DispenseError {
    /// The first non-space character matched no product prefix.
    UnknownCommand(String),
    /// Requested duration is below the configured minimum (seconds).
    DurationTooShort { min: f32 },
    /// Requested duration exceeds the product's configured ceiling (seconds).
    DurationTooLong { product: Product, max: f32 },
    /// The product's stock sensor (or the tank float switch) reports empty.
    StockUnavailable(Product),
}

impl fmt::Display for DispenseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(raw) => write!(f, "unknown command: {raw}"),
            Self::DurationTooShort { min } => {
                write!(f, "duration too short (minimum: {min}s)")
            }
            Self::DurationTooLong { product, max } => write!(
                f,
                "duration too long for {} (maximum: {max:.2}s)",
                product.name()
            ),
            Self::StockUnavailable(product) => write!(
                f,
                "{} {} is too low to dispense!",
                product.name(),
                product.shortage_noun()
            ),
        }
    }
}

impl core::error::Error for DispenseError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
