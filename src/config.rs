//! System configuration parameters
//!
//! All tunable parameters for the dispenser.  Defaults reproduce the
//! shipped board; the simulator can override them from a JSON file.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::products::{PRODUCTS, Product};

/// Smallest accepted dispense duration in seconds.
pub const MIN_DURATION_SECS: f32 = 0.01;

/// Per-product tunables, indexed by `Product as usize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Command prefix character (matched case-insensitively).
    pub prefix: char,
    /// Optional duration ceiling in seconds.  `None` = unbounded.
    pub max_duration_secs: Option<f32>,
    /// Servo angle (degrees) while dispensing.  Ignored for the pump.
    pub open_angle: u8,
    /// Servo angle (degrees) at rest.  Ignored for the pump.
    pub closed_angle: u8,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispenserConfig {
    // --- Commands ---
    /// Minimum accepted dispense duration (seconds).
    pub min_duration_secs: f32,
    /// Per-product prefix, ceiling and servo positions.
    pub products: [ProductConfig; Product::COUNT],

    // --- Timing ---
    /// Stock telemetry report interval (milliseconds)
    pub telemetry_interval_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- Serial ---
    pub baud_rate: u32,
}

impl Default for DispenserConfig {
    fn default() -> Self {
        let products = PRODUCTS.map(|spec| ProductConfig {
            prefix: spec.default_prefix,
            max_duration_secs: match spec.product {
                Product::Sugar => Some(10.0),
                Product::Water => Some(30.0),
                _ => None,
            },
            open_angle: 90,
            closed_angle: 0,
        });

        Self {
            min_duration_secs: MIN_DURATION_SECS,
            products,

            // Timing
            telemetry_interval_ms: 1000, // 1 Hz
            watchdog_timeout_ms: 10_000,

            // Serial
            baud_rate: 9600,
        }
    }
}

impl DispenserConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Tunables for one product.
    pub fn product(&self, product: Product) -> &ProductConfig {
        &self.products[product as usize]
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_duration_secs > 0.0 && self.min_duration_secs.is_finite()) {
            return Err(ConfigError::ValidationFailed(
                "min_duration_secs must be a positive number",
            ));
        }
        if self.telemetry_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "telemetry_interval_ms must be non-zero",
            ));
        }
        if self.watchdog_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must be non-zero",
            ));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be non-zero"));
        }

        for (i, pc) in self.products.iter().enumerate() {
            if !pc.prefix.is_ascii_alphabetic() {
                return Err(ConfigError::ValidationFailed(
                    "product prefix must be an ASCII letter",
                ));
            }
            let clash = self.products[i + 1..]
                .iter()
                .any(|other| other.prefix.eq_ignore_ascii_case(&pc.prefix));
            if clash {
                return Err(ConfigError::ValidationFailed(
                    "product prefixes must be unique (case-insensitive)",
                ));
            }
            if let Some(max) = pc.max_duration_secs {
                if !(max >= self.min_duration_secs && max.is_finite()) {
                    return Err(ConfigError::ValidationFailed(
                        "max_duration_secs must be at least min_duration_secs",
                    ));
                }
            }
            if pc.open_angle > 180 || pc.closed_angle > 180 {
                return Err(ConfigError::ValidationFailed(
                    "servo angles must be 0–180 degrees",
                ));
            }
            if pc.open_angle == pc.closed_angle {
                return Err(ConfigError::ValidationFailed(
                    "servo open and closed angles must differ",
                ));
            }
        }
        Ok(())
    }
}
