//! Serial event sink adapter.
//!
//! Implements [`EventSink`] for the serial peer: reply lines and telemetry
//! JSON go out over the [`Transport`], one per line.  Lifecycle events and
//! busy drops are only logged; the peer never sees them.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::serial::{Transport, write_all};

pub struct SerialEventSink<T: Transport> {
    transport: T,
}

impl<T: Transport> SerialEventSink<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn send_line(&mut self, line: &str) {
        let res = write_all(&mut self.transport, line.as_bytes())
            .and_then(|()| write_all(&mut self.transport, b"\n"))
            .and_then(|()| self.transport.flush());
        if let Err(e) = res {
            warn!("serial: write failed: {:?}", e);
        }
    }
}

impl<T: Transport> EventSink for SerialEventSink<T> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reply(reply) => {
                info!("REPLY | {}", reply);
                self.send_line(&reply.to_string());
            }
            AppEvent::Telemetry(snapshot) => {
                debug!("TELEM | {}", snapshot.to_json());
                self.send_line(&snapshot.to_json());
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::CommandDropped { raw } => {
                warn!("DROP  | busy, discarded {:?}", raw);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
