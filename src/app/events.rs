//! Outbound application events.
//!
//! The [`DispenserService`](super::service::DispenserService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: write to the serial line, log,
//! or record for a test.

use core::fmt;

use crate::fsm::StateId;
use crate::telemetry::StockSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// A reply line for the serial peer.
    Reply(Reply),

    /// Periodic stock snapshot.
    Telemetry(StockSnapshot),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A command arrived while a dispense was in flight and was discarded.
    /// Never sent to the peer.
    CommandDropped { raw: String },
}

/// One `SUCCESS:` / `ERROR:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success(String),
    Error(String),
}

impl Reply {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Message body without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(m) => write!(f, "SUCCESS: {m}"),
            Self::Error(m) => write!(f, "ERROR: {m}"),
        }
    }
}
