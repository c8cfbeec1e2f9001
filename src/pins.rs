//! GPIO / peripheral pin assignments for the dispenser main board.
//!
//! `main.rs` claims the matching `io.gpioN` peripherals by name; a
//! rewiring changes both places.

// ---------------------------------------------------------------------------
// Servo valves (LEDC PWM, 50 Hz)
// ---------------------------------------------------------------------------

pub const CUP_SERVO_GPIO: i32 = 3;
pub const SUGAR_SERVO_GPIO: i32 = 5;
pub const COFFEE_SERVO_GPIO: i32 = 6;
pub const ICEDTEA_SERVO_GPIO: i32 = 11;
pub const GREENTEA_SERVO_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Stock sensors (laser emitter + light sensor per hopper)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = laser on.
pub const SUGAR_LASER_GPIO: i32 = 7;
/// Digital input: LOW = beam blocked (stock present).
pub const SUGAR_SENSOR_GPIO: i32 = 8;

pub const COFFEE_LASER_GPIO: i32 = 9;
pub const COFFEE_SENSOR_GPIO: i32 = 10;

pub const ICEDTEA_LASER_GPIO: i32 = 12;
pub const ICEDTEA_SENSOR_GPIO: i32 = 13;

pub const GREENTEA_LASER_GPIO: i32 = 15;
pub const GREENTEA_SENSOR_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Water
// ---------------------------------------------------------------------------

/// Digital output: pump relay, HIGH = on.
pub const WATER_PUMP_GPIO: i32 = 4;
/// Digital input with pull-up: LOW = float raised (water present).
pub const WATER_FLOAT_SWITCH_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Agitator
// ---------------------------------------------------------------------------

/// Digital output: DC motor relay, HIGH = on.
pub const AGITATOR_MOTOR_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Hobby servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// Servo frame period in microseconds (1 / 50 Hz).
pub const SERVO_PERIOD_US: u16 = 20_000;
/// Pulse width at 0°.
pub const SERVO_MIN_PULSE_US: u16 = 500;
/// Pulse width at 180°.
pub const SERVO_MAX_PULSE_US: u16 = 2_500;
/// LEDC duty resolution for the servo timer.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
