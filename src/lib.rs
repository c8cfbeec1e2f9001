//! Beverage dispenser firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the host
//! simulator.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod products;
pub mod registry;
pub mod serial;
pub mod telemetry;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;

pub use app::service::DispenserService;
pub use config::DispenserConfig;
pub use error::{Error, Result};
