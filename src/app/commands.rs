//! Inbound serial commands.
//!
//! A command line is a single prefix letter naming the product followed by
//! a duration in seconds, e.g. `S2.5` or ` w 12`.  [`CommandParser`] turns
//! one raw line into an immutable [`Command`]; it never touches transport
//! or actuators.

use crate::config::DispenserConfig;
use crate::products::Product;

/// What a parsed line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Empty or all-blank line.  Ignored without a reply.
    Blank,
    /// First non-space character matched no prefix.
    Unknown,
    /// A recognised product.
    Dispense(Product),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    /// Requested duration in seconds.  `0.0` when missing or unparseable;
    /// meaningful only for [`CommandKind::Dispense`].
    pub requested_secs: f32,
    /// The trimmed input line, kept for diagnostics.
    pub raw: String,
}

impl Command {
    pub fn product(&self) -> Option<Product> {
        match self.kind {
            CommandKind::Dispense(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind == CommandKind::Blank
    }

    /// Requested duration in whole milliseconds (nearest integer).
    pub fn duration_ms(&self) -> u64 {
        secs_to_ms(self.requested_secs)
    }
}

/// Convert seconds to milliseconds, rounding to the nearest integer.
/// Negative and NaN inputs collapse to zero.
pub fn secs_to_ms(secs: f32) -> u64 {
    let ms = (f64::from(secs) * 1000.0).round();
    if ms > 0.0 { ms as u64 } else { 0 }
}

/// Prefix-table driven line parser.
#[derive(Debug, Clone)]
pub struct CommandParser {
    /// `(uppercase prefix, product)` pairs.
    prefixes: [(char, Product); Product::COUNT],
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(&DispenserConfig::default())
    }
}

impl CommandParser {
    pub fn new(config: &DispenserConfig) -> Self {
        let prefixes =
            Product::ALL.map(|p| (config.product(p).prefix.to_ascii_uppercase(), p));
        Self { prefixes }
    }

    /// Parse one raw line.  Pure: the same input always yields the same
    /// [`Command`].
    pub fn parse(&self, line: &str) -> Command {
        let raw = line.trim();
        let mut chars = raw.chars();
        let Some(first) = chars.next() else {
            return Command {
                kind: CommandKind::Blank,
                requested_secs: 0.0,
                raw: String::new(),
            };
        };

        let kind = self
            .lookup(first)
            .map_or(CommandKind::Unknown, CommandKind::Dispense);

        let requested_secs = match kind {
            CommandKind::Dispense(_) => parse_leading_float(chars.as_str().trim()),
            _ => 0.0,
        };

        Command {
            kind,
            requested_secs,
            raw: raw.to_string(),
        }
    }

    fn lookup(&self, c: char) -> Option<Product> {
        let c = c.to_ascii_uppercase();
        self.prefixes
            .iter()
            .find(|(prefix, _)| *prefix == c)
            .map(|&(_, p)| p)
    }
}

/// Parse the longest leading decimal number of `s`
/// (`[+-]digits[.digits][(e|E)[+-]digits]`).  An exponent marker with no
/// digits after it is trailing garbage.  Trailing garbage is ignored; no
/// number at all, or one too large for an `f32`, yields `0.0`.
fn parse_leading_float(s: &str) -> f32 {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let mut exp_end = exp_start;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    s[..end]
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
