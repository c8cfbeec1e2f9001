//! Newline-delimited line framing.
//!
//! The decoder accumulates incoming bytes and yields one complete line per
//! `\n`.  Carriage returns are dropped so both `\n` and `\r\n` peers work.
//! A line longer than [`MAX_LINE_LEN`] is discarded up to its terminator
//! rather than truncated into a different command.

use heapless::Vec;
use log::warn;

use super::Transport;
use crate::app::ports::CommandSource;

/// Longest accepted command line, excluding the terminator.
pub const MAX_LINE_LEN: usize = 128;

/// Bytes pulled from the transport per read.
const READ_CHUNK: usize = 32;

/// Streaming line decoder.
pub struct LineDecoder {
    buf: Vec<u8, MAX_LINE_LEN>,
    /// Set once the current line overflowed; cleared at the next `\n`.
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte.  Returns `Some(line)` when `byte` completes a line.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\r' => None,
            b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    self.buf.clear();
                    warn!("serial: line longer than {} bytes discarded", MAX_LINE_LEN);
                    return None;
                }
                let line = String::from_utf8_lossy(&self.buf).into_owned();
                self.buf.clear();
                Some(line)
            }
            _ => {
                if !self.discarding && self.buf.push(byte).is_err() {
                    self.discarding = true;
                }
                None
            }
        }
    }

    /// Bytes buffered toward the next line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }
}

/// [`CommandSource`] over a byte [`Transport`].
///
/// Reads are chunked; bytes past the end of a completed line stay buffered
/// for the next poll, so at most one line is returned per call.
pub struct LineReader<T: Transport> {
    transport: T,
    decoder: LineDecoder,
    chunk: [u8; READ_CHUNK],
    chunk_pos: usize,
    chunk_len: usize,
}

impl<T: Transport> LineReader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
            chunk: [0; READ_CHUNK],
            chunk_pos: 0,
            chunk_len: 0,
        }
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// `true` once the transport has reached end of input and every byte
    /// it delivered has gone through the decoder.  A trailing partial line
    /// is never completed and does not hold this back.
    pub fn is_exhausted(&self) -> bool {
        self.chunk_pos == self.chunk_len && self.transport.is_closed()
    }
}

impl<T: Transport> CommandSource for LineReader<T> {
    fn poll_line(&mut self) -> Option<String> {
        loop {
            while self.chunk_pos < self.chunk_len {
                let byte = self.chunk[self.chunk_pos];
                self.chunk_pos += 1;
                if let Some(line) = self.decoder.push(byte) {
                    return Some(line);
                }
            }

            match self.transport.read(&mut self.chunk) {
                Ok(0) => return None,
                Ok(n) => {
                    self.chunk_pos = 0;
                    self.chunk_len = n.min(READ_CHUNK);
                }
                Err(e) => {
                    warn!("serial: read failed: {:?}", e);
                    return None;
                }
            }
        }
    }
}
