//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!          [valid, in stock]
//!  IDLE ─────────────────────▶ EXECUTING
//!    ▲                            │
//!    └──────[elapsed >= duration]─┘
//!
//!  IDLE:      blank → stay; invalid / out of stock → ERROR reply, stay
//!  EXECUTING: every incoming line is discarded without a reply
//! ```

use log::{debug, info, warn};

use super::context::{ActuatorCommands, FsmContext, Operation};
use super::{StateDescriptor, StateId};
use crate::app::commands::CommandKind;
use crate::app::events::Reply;
use crate::error::DispenseError;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // 1: Executing
        StateDescriptor {
            id: StateId::Executing,
            name: "Executing",
            on_enter: Some(executing_enter),
            on_exit: Some(executing_exit),
            on_update: executing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: read, validate, admit
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
    debug!("IDLE: ready for commands");
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    let intake = ctx.intake.take()?;
    let cmd = intake.command;

    if cmd.kind == CommandKind::Blank {
        return None;
    }

    let verdict = ctx.validator.validate(&cmd);
    if !verdict.valid {
        if let Some(reason) = verdict.reason {
            warn!("IDLE: rejected {:?}: {}", cmd.raw, reason);
            ctx.reply(Reply::Error(reason.to_string()));
        }
        return None;
    }

    let product = cmd.product()?;
    if !intake.available {
        let reason = DispenseError::StockUnavailable(product);
        warn!("IDLE: rejected {:?}: {}", cmd.raw, reason);
        ctx.reply(Reply::Error(reason.to_string()));
        return None;
    }

    ctx.reply(Reply::Success(format!(
        "{} command received: {:.2}s",
        product.name(),
        cmd.requested_secs
    )));
    ctx.slot.admit(Operation {
        product,
        start_ms: ctx.now_ms,
        duration_ms: cmd.duration_ms(),
    });
    Some(StateId::Executing)
}

// ═══════════════════════════════════════════════════════════════════════════
//  EXECUTING state: one operation in flight, input discarded
// ═══════════════════════════════════════════════════════════════════════════

fn executing_enter(ctx: &mut FsmContext) {
    if let Some(op) = ctx.slot.operation().copied() {
        ctx.commands.engaged = Some(op.product);
        info!("EXECUTING: {} for {} ms", op.product.name(), op.duration_ms);
    }
}

fn executing_exit(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
    if let Some(op) = ctx.slot.clear() {
        let spec = op.product.spec();
        info!("EXECUTING: {} done after {} ms", spec.name, op.elapsed_ms(ctx.now_ms));
        ctx.reply(Reply::Success(format!("{} {} completed", spec.name, spec.action)));
    }
}

fn executing_update(ctx: &mut FsmContext) -> Option<StateId> {
    // Drained from the transport but never validated or acknowledged.
    if let Some(intake) = ctx.intake.take() {
        if !intake.command.is_blank() {
            ctx.dropped = Some(intake.command.raw);
        }
    }

    match ctx.slot.operation() {
        Some(op) if !op.is_due(ctx.now_ms) => None,
        _ => Some(StateId::Idle),
    }
}
