//! Log entry view and bounded message rendering

use core::fmt::{self, Write};

use super::frame::FrameHeader;
use super::level::LogLevel;

/// A decoded log record, borrowing its message from a frame or scratch buffer.
///
/// This is what the flush and immediate callbacks receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry<'a> {
    area: u8,
    area_name: &'static str,
    level: LogLevel,
    sequence: u16,
    message: &'a str,
}

impl<'a> LogEntry<'a> {
    /// Builds an entry from its parts.
    pub const fn new(
        area: u8,
        area_name: &'static str,
        level: LogLevel,
        sequence: u16,
        message: &'a str,
    ) -> Self {
        Self {
            area,
            area_name,
            level,
            sequence,
            message,
        }
    }

    /// Builds an entry from a complete encoded frame and its decoded header.
    pub fn from_frame(frame: &'a [u8], header: &FrameHeader, area_name: &'static str) -> Self {
        let payload = frame.get(header.payload_range()).unwrap_or(&[]);
        Self::new(
            header.area,
            area_name,
            header.level,
            header.sequence,
            utf8_prefix(payload),
        )
    }

    /// Area key
    pub fn area(&self) -> u8 {
        self.area
    }

    /// Registered area name, `"?"` for unregistered areas
    pub fn area_name(&self) -> &'static str {
        self.area_name
    }

    /// Severity
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Name of the severity
    pub fn level_name(&self) -> &'static str {
        self.level.as_str()
    }

    /// Sequence number assigned when the record was accepted
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Rendered message text
    pub fn message(&self) -> &'a str {
        self.message
    }
}

impl fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>9}] {:<5}: {}",
            self.area_name,
            self.level.as_str(),
            self.message
        )
    }
}

/// Longest valid UTF-8 prefix of `bytes`.
pub(crate) fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => core::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or(""),
    }
}

/// Bounded `fmt::Write` sink over a byte region.
///
/// Once a write does not fit, the writer keeps the longest prefix that ends
/// on a character boundary, returns `fmt::Error` to stop the formatter and
/// rejects everything after that.
pub struct MessageWriter<'a> {
    buffer: &'a mut [u8],
    pos: usize,
    truncated: bool,
}

impl<'a> MessageWriter<'a> {
    /// Creates a writer that fills `buffer` from the start.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            pos: 0,
            truncated: false,
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.pos
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Whether output was cut short
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl Write for MessageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Err(fmt::Error);
        }

        let remaining = self.buffer.len() - self.pos;
        let mut to_copy = s.len();
        if to_copy > remaining {
            to_copy = remaining;
            while !s.is_char_boundary(to_copy) {
                to_copy -= 1;
            }
            self.truncated = true;
        }

        self.buffer[self.pos..self.pos + to_copy].copy_from_slice(&s.as_bytes()[..to_copy]);
        self.pos += to_copy;

        if self.truncated {
            Err(fmt::Error)
        } else {
            Ok(())
        }
    }
}

/// Renders `args` into `buffer`, truncating silently, and returns the number
/// of bytes produced.
pub fn render(buffer: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    let mut writer = MessageWriter::new(buffer);
    let _ = writer.write_fmt(args);
    writer.len()
}
