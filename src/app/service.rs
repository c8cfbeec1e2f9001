//! Application service, the hexagonal core.
//!
//! [`DispenserService`] owns the FSM, its context, the actuator registry and
//! the telemetry poller.  It exposes a hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, so the whole service runs
//! against mock adapters in tests.
//!
//! ```text
//!  CommandSource ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  SensorPort    ──▶ │    DispenserService      │
//!  ActuatorPort  ◀── │ Parser · FSM · Registry  │
//!                    └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::DispenserConfig;
use crate::fsm::context::{ActuatorCommands, FsmContext, Intake};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::registry::ActuatorRegistry;
use crate::telemetry::TelemetryPoller;

use super::commands::CommandParser;
use super::events::AppEvent;
use super::ports::{ActuatorPort, CommandSource, EventSink, SensorPort};
use super::validate::Validator;

/// Monotonic counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub ticks: u64,
    /// Commands that started a dispense.
    pub admitted: u64,
    /// Commands answered with `ERROR:`.
    pub rejected: u64,
    pub completed: u64,
    /// Commands discarded because a dispense was in flight.
    pub dropped: u64,
}

// ───────────────────────────────────────────────────────────────
// DispenserService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct DispenserService {
    fsm: Fsm,
    ctx: FsmContext,
    parser: CommandParser,
    registry: ActuatorRegistry,
    telemetry: TelemetryPoller,
    /// Actuator state last written to the hardware.
    applied: ActuatorCommands,
    stats: ServiceStats,
}

impl DispenserService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: &DispenserConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: FsmContext::new(Validator::new(config)),
            parser: CommandParser::new(config),
            registry: ActuatorRegistry::new(config),
            telemetry: TelemetryPoller::new(config.telemetry_interval_ms),
            applied: ActuatorCommands::all_off(),
            stats: ServiceStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every actuator to rest and start the FSM in Idle.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.applied = ActuatorCommands::all_off();
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("DispenserService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one dispatch cycle: telemetry → read line → FSM → actuators.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        source: &mut impl CommandSource,
        sink: &mut impl EventSink,
    ) {
        self.stats.ticks += 1;
        let prev_state = self.fsm.current_state();

        // 1. Telemetry runs regardless of the slot.
        if let Some(snapshot) = self.telemetry.tick(now_ms, &self.registry, hw) {
            sink.emit(&AppEvent::Telemetry(snapshot));
        }

        // 2. Drain one line.  Stock is only queried when the machine could
        //    actually admit the command.
        let intake = source.poll_line().map(|line| {
            let command = self.parser.parse(&line);
            let available = match command.product() {
                Some(p) if !self.ctx.slot.is_active() => self.registry.is_available(p, &mut *hw),
                _ => true,
            };
            Intake { command, available }
        });
        self.ctx.now_ms = now_ms;
        self.ctx.intake = intake;

        // 3. FSM tick (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 4. Apply actuator changes via the registry
        self.apply_actuators(hw);

        // 5. Flush replies and bookkeeping
        self.drain_outputs(prev_state, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// `true` while a dispense is in flight.
    pub fn is_executing(&self) -> bool {
        self.ctx.slot.is_active()
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    pub fn registry(&self) -> &ActuatorRegistry {
        &self.registry
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the FSM's desired actuator state into port calls, touching
    /// only what changed since the last tick.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let want = self.ctx.commands;
        let have = self.applied;

        if want.engaged != have.engaged {
            if let Some(p) = have.engaged {
                if let Err(e) = self.registry.end(p, hw) {
                    warn!("failed to close {}: {}", p.name(), e);
                }
            }
            if let Some(p) = want.engaged {
                if let Err(e) = self.registry.begin(p, hw) {
                    warn!("failed to open {}: {}", p.name(), e);
                }
            }
        }

        self.applied = want;
    }

    fn drain_outputs(&mut self, prev_state: StateId, sink: &mut impl EventSink) {
        let new_state = self.fsm.current_state();

        for reply in &self.ctx.replies {
            if !reply.is_success() {
                self.stats.rejected += 1;
            }
            sink.emit(&AppEvent::Reply(reply.clone()));
        }
        self.ctx.replies.clear();

        if let Some(raw) = self.ctx.dropped.take() {
            self.stats.dropped += 1;
            warn!("busy, dropped command {:?}", raw);
            sink.emit(&AppEvent::CommandDropped { raw });
        }

        if new_state != prev_state {
            match new_state {
                StateId::Executing => self.stats.admitted += 1,
                StateId::Idle => self.stats.completed += 1,
            }
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }
}
