//! Application core: pure domain logic, zero I/O.
//!
//! Command parsing, validation and the dispatch service for the
//! dispenser.  All interaction with hardware and the serial link happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod validate;
