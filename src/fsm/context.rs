//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the current time, the line taken from the transport this tick,
//! the execution slot, actuator requests and outgoing replies.  Think of it
//! as the "blackboard" in a blackboard architecture.

use heapless::Vec;

use crate::app::commands::Command;
use crate::app::events::Reply;
use crate::app::validate::Validator;
use crate::products::Product;

// ---------------------------------------------------------------------------
// Intake (written by the service before each tick, taken by handlers)
// ---------------------------------------------------------------------------

/// The command read from the transport this tick.
#[derive(Debug, Clone)]
pub struct Intake {
    pub command: Command,
    /// Result of the stock query for the command's product, taken
    /// immediately before the tick.  `true` for non-dispense commands.
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Execution slot
// ---------------------------------------------------------------------------

/// The operation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub product: Product,
    /// Monotonic timestamp captured at admission (ms).
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl Operation {
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.duration_ms
    }
}

/// Zero-or-one in-flight operation.  Only the Idle handler fills it and
/// only the Executing exit clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSlot {
    op: Option<Operation>,
}

impl ExecutionSlot {
    pub fn is_active(&self) -> bool {
        self.op.is_some()
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.op.as_ref()
    }

    pub(crate) fn admit(&mut self, op: Operation) {
        debug_assert!(self.op.is_none(), "slot admitted while active");
        self.op = Some(op);
    }

    pub(crate) fn clear(&mut self) -> Option<Operation> {
        self.op.take()
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Desired actuator state after the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Product whose actuators should be running.  The registry decides
    /// which ones that means.
    pub engaged: Option<Product>,
}

impl ActuatorCommands {
    /// Everything closed and stopped.
    pub fn all_off() -> Self {
        Self::default()
    }
}

/// Upper bound on replies produced by a single tick (an ack plus a
/// completion at most, with headroom).
pub const MAX_REPLIES_PER_TICK: usize = 4;

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic time of the current tick (ms).
    pub now_ms: u64,

    // -- Input --
    pub intake: Option<Intake>,
    pub validator: Validator,

    // -- State --
    pub slot: ExecutionSlot,

    // -- Outputs --
    pub commands: ActuatorCommands,
    pub replies: Vec<Reply, MAX_REPLIES_PER_TICK>,
    /// Raw text of commands discarded while busy, drained each tick.
    pub dropped: Option<String>,
}

impl FsmContext {
    pub fn new(validator: Validator) -> Self {
        Self {
            now_ms: 0,
            intake: None,
            validator,
            slot: ExecutionSlot::default(),
            commands: ActuatorCommands::all_off(),
            replies: Vec::new(),
            dropped: None,
        }
    }

    /// Queue a reply for the service to emit after the tick.
    pub fn reply(&mut self, reply: Reply) {
        if let Err(r) = self.replies.push(reply) {
            log::warn!("reply queue full, dropping: {}", r);
        }
    }
}
