//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use std::collections::VecDeque;

use cafe_dispenser::app::events::{AppEvent, Reply};
use cafe_dispenser::app::ports::{ActuatorPort, CommandSource, EventSink, SensorPort};
use cafe_dispenser::error::{ActuatorError, SensorError};
use cafe_dispenser::products::{ServoId, StockSensorId};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Servo { servo: ServoId, angle: u8 },
    Pump(bool),
    Agitator(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Indexed by `StockSensorId as usize`.
    pub stock: [bool; StockSensorId::COUNT],
    pub tank: bool,
    /// When set, every stock read fails.
    pub sensor_fault: bool,
    pub sensor_reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    /// Every hopper full and the tank wet.
    pub fn stocked() -> Self {
        Self {
            calls: Vec::new(),
            stock: [true; StockSensorId::COUNT],
            tank: true,
            sensor_fault: false,
            sensor_reads: 0,
        }
    }

    pub fn set_stock(&mut self, sensor: StockSensorId, present: bool) {
        self.stock[sensor as usize] = present;
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Last commanded angle for `servo`, if any call touched it.
    pub fn servo_angle(&self, servo: ServoId) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Servo { servo: s, angle } if *s == servo => Some(*angle),
            _ => None,
        })
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Pump(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn agitator_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Agitator(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn stock_present(&mut self, sensor: StockSensorId) -> Result<bool, SensorError> {
        self.sensor_reads += 1;
        if self.sensor_fault {
            return Err(SensorError::GpioReadFailed);
        }
        Ok(self.stock[sensor as usize])
    }

    fn tank_has_liquid(&mut self) -> Result<bool, SensorError> {
        self.sensor_reads += 1;
        if self.sensor_fault {
            return Err(SensorError::GpioReadFailed);
        }
        Ok(self.tank)
    }
}

impl ActuatorPort for MockHardware {
    fn set_servo_angle(&mut self, servo: ServoId, angle: u8) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Servo { servo, angle });
        Ok(())
    }

    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Pump(on));
        Ok(())
    }

    fn set_agitator(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Agitator(on));
        Ok(())
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── ScriptSource ─────────────────────────────────────────────

/// Hands out queued lines one per poll and counts how many were taken.
#[derive(Default)]
pub struct ScriptSource {
    lines: VecDeque<String>,
    pub taken: usize,
}

#[allow(dead_code)]
impl ScriptSource {
    pub fn push(&mut self, line: &str) {
        self.lines.push_back(line.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl CommandSource for ScriptSource {
    fn poll_line(&mut self) -> Option<String> {
        let line = self.lines.pop_front()?;
        self.taken += 1;
        Some(line)
    }
}

// ── RecordingSink ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    /// Every reply in wire format (`SUCCESS: ...` / `ERROR: ...`).
    pub fn replies(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Reply(r) => Some(r.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn reply_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Reply(_)))
            .count()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Reply(Reply::Error(m)) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
