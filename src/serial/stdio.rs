//! Host serial transport over stdin/stdout.
//!
//! The two halves are separate types so the line reader and the event sink
//! can each own one, the way RX and TX are split on the UART.  stdin is
//! read on a helper thread and handed over through a channel so `read`
//! never blocks the dispatch loop.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::info;

use super::Transport;

/// Non-blocking stdin.  Writes are discarded.
pub struct StdinTransport {
    rx: Receiver<u8>,
    closed: bool,
}

impl StdinTransport {
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let stdin = io::stdin();
                for byte in stdin.lock().bytes() {
                    let Ok(byte) = byte else { break };
                    if tx.send(byte).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self { rx, closed: false })
    }

}

impl Transport for StdinTransport {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.try_recv() {
                Ok(b) => {
                    buf[n] = b;
                    n += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        info!("stdin closed");
                        self.closed = true;
                    }
                    break;
                }
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Set by the `read` that hit EOF, which may also have returned the
    /// last bytes of input.
    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// stdout.  Never yields input.
#[derive(Default)]
pub struct StdoutTransport;

impl Transport for StdoutTransport {
    type Error = io::Error;

    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        io::stdout().write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
