//! Periodic stock telemetry.
//!
//! Runs on its own cadence, independent of the execution slot: the poller
//! fires every `telemetry_interval_ms` whether or not a dispense is in
//! flight, samples every stock sensor plus the tank float switch, and hands
//! back a [`StockSnapshot`] for the caller to emit.
//!
//! Serialized form, one JSON object per line in product-table order:
//!
//! ```text
//! {"sugar":"High","water":"Low","coffee":"High","icetea":"High","greentea":"Low"}
//! ```

use heapless::Vec;
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::app::ports::SensorPort;
use crate::products::{PRODUCTS, Product};
use crate::registry::ActuatorRegistry;

/// Number of products with a stock source.
pub const TRACKED: usize = Product::COUNT - 1;

/// Two-state level indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn from_available(available: bool) -> Self {
        if available { Self::High } else { Self::Low }
    }
}

/// Point-in-time stock levels, keyed by telemetry key.  Not retained
/// between ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
    entries: Vec<(&'static str, Level), TRACKED>,
}

impl StockSnapshot {
    pub fn get(&self, key: &str) -> Option<Level> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, level)| level)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Level)> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_json(&self) -> String {
        // A map of &str to unit variants cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for StockSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, level) in &self.entries {
            map.serialize_entry(key, level)?;
        }
        map.end()
    }
}

/// Interval-gated sampler.
#[derive(Debug, Clone)]
pub struct TelemetryPoller {
    interval_ms: u64,
    last_fire_ms: u64,
}

impl TelemetryPoller {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
            last_fire_ms: 0,
        }
    }

    /// Sample all stock sources if a full interval has passed since the
    /// last fire.  The first fire happens one interval after boot.
    pub fn tick(
        &mut self,
        now_ms: u64,
        registry: &ActuatorRegistry,
        hw: &mut impl SensorPort,
    ) -> Option<StockSnapshot> {
        if now_ms.saturating_sub(self.last_fire_ms) < self.interval_ms {
            return None;
        }
        self.last_fire_ms = now_ms;

        let mut snapshot = StockSnapshot::default();
        for spec in PRODUCTS.iter().filter(|s| s.stock.is_some()) {
            let level = Level::from_available(registry.is_available(spec.product, hw));
            // TRACKED matches the number of stock-gated rows.
            let _ = snapshot.entries.push((spec.telemetry_key, level));
        }
        debug!("telemetry: {}", snapshot.to_json());
        Some(snapshot)
    }
}
