//! In-buffer frame format
//!
//! Each record in the ring is a fixed header followed by the rendered
//! message bytes:
//!
//! ```text
//! +-------------+------+-------+----------+-----------------------+
//! | payload_len | area | level | sequence | payload (payload_len) |
//! |   u16 le    |  u8  |  u8   |  u16 le  |     UTF-8 bytes       |
//! +-------------+------+-------+----------+-----------------------+
//! ```
//!
//! The header is serialized field by field, so the layout does not depend on
//! struct packing. A frame can always be decoded without looking at its
//! neighbours.

use core::fmt;
use core::mem::size_of;
use core::ops::Range;

use super::level::LogLevel;

const LEN_OFFSET: usize = 0;
const AREA_OFFSET: usize = LEN_OFFSET + size_of::<u16>();
const LEVEL_OFFSET: usize = AREA_OFFSET + size_of::<u8>();
const SEQUENCE_OFFSET: usize = LEVEL_OFFSET + size_of::<u8>();

/// Size of an encoded frame header in bytes
pub const HEADER_SIZE: usize = SEQUENCE_OFFSET + size_of::<u16>();

/// Frame decoding failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer than [`HEADER_SIZE`] bytes were available
    Truncated,
    /// The header is inconsistent with the bytes around it
    Corrupt,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Truncated => f.write_str("truncated frame header"),
            FrameError::Corrupt => f.write_str("corrupt frame header"),
        }
    }
}

/// Result type of frame decoding
pub type FrameResult<T> = Result<T, FrameError>;

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Number of message bytes after the header
    pub payload_len: u16,
    /// Area key
    pub area: u8,
    /// Severity
    pub level: LogLevel,
    /// Global sequence number, wrapping
    pub sequence: u16,
}

impl FrameHeader {
    /// Total encoded size of the frame, header included.
    pub const fn frame_len(&self) -> usize {
        HEADER_SIZE + self.payload_len as usize
    }

    /// Byte range of the payload within the frame.
    pub const fn payload_range(&self) -> Range<usize> {
        HEADER_SIZE..self.frame_len()
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[LEN_OFFSET..AREA_OFFSET].copy_from_slice(&self.payload_len.to_le_bytes());
        header[AREA_OFFSET] = self.area;
        header[LEVEL_OFFSET] = self.level as u8;
        header[SEQUENCE_OFFSET..HEADER_SIZE].copy_from_slice(&self.sequence.to_le_bytes());
        header
    }

    /// Writes the header into the first [`HEADER_SIZE`] bytes of `into`.
    pub fn encode(&self, into: &mut [u8]) -> FrameResult<()> {
        let header = into.get_mut(..HEADER_SIZE).ok_or(FrameError::Truncated)?;
        header.copy_from_slice(&self.to_bytes());
        Ok(())
    }

    /// Decodes the header at the start of `from`.
    ///
    /// `from` must contain the whole frame: a payload that runs past the end
    /// of the span is reported as [`FrameError::Corrupt`].
    pub fn decode(from: &[u8]) -> FrameResult<Self> {
        let header = from.get(..HEADER_SIZE).ok_or(FrameError::Truncated)?;
        let payload_len = u16::from_le_bytes([header[LEN_OFFSET], header[LEN_OFFSET + 1]]);
        let level = LogLevel::try_from_u8(header[LEVEL_OFFSET]).ok_or(FrameError::Corrupt)?;
        let sequence = u16::from_le_bytes([header[SEQUENCE_OFFSET], header[SEQUENCE_OFFSET + 1]]);

        let decoded = Self {
            payload_len,
            area: header[AREA_OFFSET],
            level,
            sequence,
        };
        if decoded.frame_len() > from.len() {
            return Err(FrameError::Corrupt);
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{kassert, test_case};

    test_case!(test_header_size, {
        kassert!(HEADER_SIZE == 6);
    });

    test_case!(test_frame_round_trip, {
        let payload = b"disk timeout";
        let header = FrameHeader {
            payload_len: payload.len() as u16,
            area: 3,
            level: LogLevel::Warn,
            sequence: 7,
        };

        let mut frame = [0u8; HEADER_SIZE + 12];
        header.encode(&mut frame).unwrap();
        frame[header.payload_range()].copy_from_slice(payload);

        let decoded = FrameHeader::decode(&frame).unwrap();
        kassert!(decoded == header);
        kassert!(decoded.frame_len() == frame.len());
        kassert!(&frame[decoded.payload_range()] == payload);
    });

    test_case!(test_decode_truncated, {
        kassert!(FrameHeader::decode(&[]) == Err(FrameError::Truncated));
        kassert!(FrameHeader::decode(&[0; HEADER_SIZE - 1]) == Err(FrameError::Truncated));
    });

    test_case!(test_encode_into_short_buffer, {
        let header = FrameHeader {
            payload_len: 0,
            area: 0,
            level: LogLevel::Info,
            sequence: 0,
        };
        kassert!(header.encode(&mut [0; 2]) == Err(FrameError::Truncated));
    });

    test_case!(test_decode_payload_overrun, {
        let header = FrameHeader {
            payload_len: 10,
            area: 1,
            level: LogLevel::Info,
            sequence: 0,
        };
        let mut frame = [0u8; HEADER_SIZE + 4];
        header.encode(&mut frame).unwrap();
        kassert!(FrameHeader::decode(&frame) == Err(FrameError::Corrupt));
    });

    test_case!(test_decode_bad_level, {
        let mut frame = [0u8; HEADER_SIZE];
        frame[LEVEL_OFFSET] = 0xff;
        kassert!(FrameHeader::decode(&frame) == Err(FrameError::Corrupt));
    });

    test_case!(test_empty_payload, {
        let header = FrameHeader {
            payload_len: 0,
            area: 200,
            level: LogLevel::Fatal,
            sequence: u16::MAX,
        };
        let mut frame = [0u8; HEADER_SIZE];
        header.encode(&mut frame).unwrap();
        kassert!(FrameHeader::decode(&frame) == Ok(header));
    });
}
