//! Serial command link.
//!
//! Concrete transports:
//! - UART0 on the ESP32 (see `main.rs`)
//! - stdin/stdout in the host simulator ([`stdio`])
//!
//! [`LineReader`] sits on top of any [`Transport`] and implements the
//! [`CommandSource`](crate::app::ports::CommandSource) port, so the service
//! never sees bytes.

pub mod line;
#[cfg(not(target_os = "espidf"))]
pub mod stdio;

pub use line::{LineDecoder, LineReader, MAX_LINE_LEN};

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// `true` once the peer has hung up and `read` will never yield
    /// another byte.  A UART never closes.
    fn is_closed(&self) -> bool {
        false
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Write all of `data`, retrying short writes.  Gives up on a zero-length
/// write so a stalled peer cannot wedge the dispatch loop.
pub fn write_all<T: Transport>(t: &mut T, mut data: &[u8]) -> Result<(), T::Error> {
    while !data.is_empty() {
        let n = t.write(data)?;
        if n == 0 {
            log::warn!("serial: write stalled, {} bytes lost", data.len());
            break;
        }
        data = &data[n..];
    }
    Ok(())
}
