//! Duration bounds checking.
//!
//! Stock availability is deliberately *not* checked here: stock can change
//! between commands, so the state machine queries it immediately before
//! engaging actuators.

use crate::config::DispenserConfig;
use crate::error::DispenseError;
use crate::products::Product;

use super::commands::{Command, CommandKind};

/// Outcome of [`Validator::validate`].  Never mutates the command.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<DispenseError>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self { valid: true, reason: None }
    }

    fn reject(reason: DispenseError) -> Self {
        Self { valid: false, reason: Some(reason) }
    }
}

/// Minimum and per-product maximum duration rules.
#[derive(Debug, Clone)]
pub struct Validator {
    min_secs: f32,
    max_secs: [Option<f32>; Product::COUNT],
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&DispenserConfig::default())
    }
}

impl Validator {
    pub fn new(config: &DispenserConfig) -> Self {
        Self {
            min_secs: config.min_duration_secs,
            max_secs: Product::ALL.map(|p| config.product(p).max_duration_secs),
        }
    }

    /// Check a parsed command.
    ///
    /// Blank commands are never admitted and carry no reason; callers filter
    /// them out before getting here.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self, cmd: &Command) -> ValidationResult {
        let product = match cmd.kind {
            CommandKind::Blank => return ValidationResult { valid: false, reason: None },
            CommandKind::Unknown => {
                return ValidationResult::reject(DispenseError::UnknownCommand(cmd.raw.clone()));
            }
            CommandKind::Dispense(p) => p,
        };

        // NaN fails this comparison too and is rejected as too short.
        if !(cmd.requested_secs >= self.min_secs) {
            return ValidationResult::reject(DispenseError::DurationTooShort {
                min: self.min_secs,
            });
        }

        if let Some(max) = self.max_secs[product as usize] {
            if cmd.requested_secs > max {
                return ValidationResult::reject(DispenseError::DurationTooLong { product, max });
            }
        }

        ValidationResult::ok()
    }
}
