//! Actuator capability registry.
//!
//! The single place that knows how a product maps onto hardware: which
//! actuator opens for it, at what position, whether the agitator runs with
//! it, and which sensor gates it.  The state machine only ever says
//! "begin Sugar" / "end Sugar".
//!
//! Bindings are built once from the static [`PRODUCTS`] table plus the
//! configured servo angles and live for the lifetime of the process.

use log::{debug, warn};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::DispenserConfig;
use crate::error::ActuatorError;
use crate::products::{PRODUCTS, Primary, Product, ServoId, StockSource};

/// Physical actuator plus its two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorBinding {
    Servo {
        servo: ServoId,
        open_angle: u8,
        closed_angle: u8,
    },
    Pump,
}

/// Everything needed to dispense one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductBinding {
    pub primary: ActuatorBinding,
    pub stock: Option<StockSource>,
    pub agitated: bool,
}

/// Statically sized binding table indexed by `Product as usize`.
#[derive(Debug, Clone)]
pub struct ActuatorRegistry {
    bindings: [ProductBinding; Product::COUNT],
}

impl Default for ActuatorRegistry {
    fn default() -> Self {
        Self::new(&DispenserConfig::default())
    }
}

impl ActuatorRegistry {
    pub fn new(config: &DispenserConfig) -> Self {
        let bindings = PRODUCTS.map(|spec| {
            let pc = config.product(spec.product);
            let primary = match spec.primary {
                Primary::Servo(servo) => ActuatorBinding::Servo {
                    servo,
                    open_angle: pc.open_angle,
                    closed_angle: pc.closed_angle,
                },
                Primary::Pump => ActuatorBinding::Pump,
            };
            ProductBinding {
                primary,
                stock: spec.stock,
                agitated: spec.agitated,
            }
        });
        Self { bindings }
    }

    pub fn binding(&self, product: Product) -> &ProductBinding {
        &self.bindings[product as usize]
    }

    /// Closed angle of every servo, indexed by `ServoId as usize`.  This is
    /// where the drivers park at boot.
    pub fn rest_angles(&self) -> [u8; ServoId::COUNT] {
        let mut angles = [0; ServoId::COUNT];
        for binding in &self.bindings {
            if let ActuatorBinding::Servo { servo, closed_angle, .. } = binding.primary {
                angles[servo as usize] = closed_angle;
            }
        }
        angles
    }

    /// Open the product's primary actuator, then start the agitator if the
    /// product uses it.  The agitator is left alone when the primary fails.
    pub fn begin(&self, product: Product, hw: &mut impl ActuatorPort) -> Result<(), ActuatorError> {
        debug!("registry: begin {}", product.name());
        let binding = self.binding(product);
        match binding.primary {
            ActuatorBinding::Servo { servo, open_angle, .. } => {
                hw.set_servo_angle(servo, open_angle)?;
            }
            ActuatorBinding::Pump => hw.set_pump(true)?,
        }
        if binding.agitated {
            hw.set_agitator(true)?;
        }
        Ok(())
    }

    /// Return the product's primary actuator to rest and stop the agitator.
    /// Both are attempted even if the first fails; the first error wins.
    pub fn end(&self, product: Product, hw: &mut impl ActuatorPort) -> Result<(), ActuatorError> {
        debug!("registry: end {}", product.name());
        let binding = self.binding(product);
        let closed = match binding.primary {
            ActuatorBinding::Servo { servo, closed_angle, .. } => {
                hw.set_servo_angle(servo, closed_angle)
            }
            ActuatorBinding::Pump => hw.set_pump(false),
        };
        let stopped = if binding.agitated {
            hw.set_agitator(false)
        } else {
            Ok(())
        };
        closed.and(stopped)
    }

    /// Query the product's stock sensor.  Products without one are always
    /// available; a failed read counts as empty.
    pub fn is_available(&self, product: Product, hw: &mut impl SensorPort) -> bool {
        let reading = match self.binding(product).stock {
            None => return true,
            Some(StockSource::Laser(sensor)) => hw.stock_present(sensor),
            Some(StockSource::Tank) => hw.tank_has_liquid(),
        };
        reading.unwrap_or_else(|e| {
            warn!("registry: {} stock read failed ({}), treating as empty", product.name(), e);
            false
        })
    }
}
