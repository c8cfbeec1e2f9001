//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements      | Connects to                  |
//! |---------------|-----------------|------------------------------|
//! | `hardware`    | SensorPort      | stock lasers, float switch   |
//! |               | ActuatorPort    | servo PWM, pump + agitator   |
//! | `serial_sink` | EventSink       | serial transport + log       |
//! | `sim`         | (pins)          | in-memory board for the host |
//! | `time`        | (clock)         | ESP32 system timer / Instant |

pub mod hardware;
pub mod serial_sink;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
pub mod time;
