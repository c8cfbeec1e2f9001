//! Static product table.
//!
//! One row per dispensable product.  Everything the firmware needs to know
//! about a product that is *not* tunable lives here: display name, default
//! command prefix, telemetry key, reply wording, which actuator dispenses it
//! and which sensor gates it.  Tunables (prefix overrides, duration
//! ceilings, servo angles) live in [`crate::config`].
//!
//! ```text
//!  Product  │ prefix │ primary          │ stock source     │ agitator
//!  ─────────┼────────┼──────────────────┼──────────────────┼─────────
//!  Sugar    │   S    │ servo (sugar)    │ laser (sugar)    │   yes
//!  Water    │   W    │ pump relay       │ float switch     │   yes
//!  Coffee   │   C    │ servo (coffee)   │ laser (coffee)   │   yes
//!  IcedTea  │   I    │ servo (iced tea) │ laser (iced tea) │   yes
//!  GreenTea │   G    │ servo (green tea)│ laser (green tea)│   yes
//!  Cup      │   U    │ servo (cup)      │ none             │   no
//! ```

use serde::{Deserialize, Serialize};

/// A dispensable product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Product {
    Sugar = 0,
    Water = 1,
    Coffee = 2,
    IcedTea = 3,
    GreenTea = 4,
    Cup = 5,
}

/// Servo-driven dispensing valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ServoId {
    Sugar = 0,
    Coffee = 1,
    IcedTea = 2,
    GreenTea = 3,
    Cup = 4,
}

impl ServoId {
    pub const COUNT: usize = 5;
}

/// Laser/light-barrier stock sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StockSensorId {
    Sugar = 0,
    Coffee = 1,
    IcedTea = 2,
    GreenTea = 3,
}

impl StockSensorId {
    pub const COUNT: usize = 4;
}

/// The actuator that physically dispenses a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primary {
    /// Servo valve moved between a closed and an open angle.
    Servo(ServoId),
    /// Water pump relay.
    Pump,
}

/// What gates a product's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSource {
    Laser(StockSensorId),
    /// The water tank float switch.
    Tank,
}

/// Static description of one product.
pub struct ProductSpec {
    pub product: Product,
    pub name: &'static str,
    pub default_prefix: char,
    /// Key used in the telemetry JSON object.
    pub telemetry_key: &'static str,
    /// Verb in the completion reply ("Sugar dispensing completed").
    pub action: &'static str,
    /// Noun in the shortage reply ("Sugar stock is too low…").
    pub shortage_noun: &'static str,
    pub primary: Primary,
    pub stock: Option<StockSource>,
    /// Whether the agitator runs while this product dispenses.
    pub agitated: bool,
}

/// Indexed by `Product as usize`.
pub const PRODUCTS: [ProductSpec; Product::COUNT] = [
    ProductSpec {
        product: Product::Sugar,
        name: "Sugar",
        default_prefix: 'S',
        telemetry_key: "sugar",
        action: "dispensing",
        shortage_noun: "stock",
        primary: Primary::Servo(ServoId::Sugar),
        stock: Some(StockSource::Laser(StockSensorId::Sugar)),
        agitated: true,
    },
    ProductSpec {
        product: Product::Water,
        name: "Water",
        default_prefix: 'W',
        telemetry_key: "water",
        action: "pumping",
        shortage_noun: "tank",
        primary: Primary::Pump,
        stock: Some(StockSource::Tank),
        agitated: true,
    },
    ProductSpec {
        product: Product::Coffee,
        name: "Coffee",
        default_prefix: 'C',
        telemetry_key: "coffee",
        action: "dispensing",
        shortage_noun: "stock",
        primary: Primary::Servo(ServoId::Coffee),
        stock: Some(StockSource::Laser(StockSensorId::Coffee)),
        agitated: true,
    },
    ProductSpec {
        product: Product::IcedTea,
        name: "IcedTea",
        default_prefix: 'I',
        telemetry_key: "icetea",
        action: "dispensing",
        shortage_noun: "stock",
        primary: Primary::Servo(ServoId::IcedTea),
        stock: Some(StockSource::Laser(StockSensorId::IcedTea)),
        agitated: true,
    },
    ProductSpec {
        product: Product::GreenTea,
        name: "GreenTea",
        default_prefix: 'G',
        telemetry_key: "greentea",
        action: "dispensing",
        shortage_noun: "stock",
        primary: Primary::Servo(ServoId::GreenTea),
        stock: Some(StockSource::Laser(StockSensorId::GreenTea)),
        agitated: true,
    },
    ProductSpec {
        product: Product::Cup,
        name: "Cup",
        default_prefix: 'U',
        telemetry_key: "cup",
        action: "dispensing",
        shortage_noun: "stock",
        primary: Primary::Servo(ServoId::Cup),
        stock: None,
        agitated: false,
    },
];

impl Product {
    /// Total number of products, used to size per-product arrays.
    pub const COUNT: usize = 6;

    /// Every product in table order.
    pub const ALL: [Product; Product::COUNT] = [
        Product::Sugar,
        Product::Water,
        Product::Coffee,
        Product::IcedTea,
        Product::GreenTea,
        Product::Cup,
    ];

    pub fn spec(self) -> &'static ProductSpec {
        &PRODUCTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn shortage_noun(self) -> &'static str {
        self.spec().shortage_noun
    }
}
