//! Log severity levels

/// Severity of a log record.
///
/// Ordered by ordinal: a record passes an area whose threshold is `t` when
/// `t != None && level >= t`. As a threshold, `None` silences the area.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Disables an area when used as its threshold
    None = 0,
    /// Detailed diagnostics
    Debug = 1,
    /// Normal operation
    Info = 2,
    /// Something unexpected but recoverable
    Warn = 3,
    /// Operation failed
    Error = 4,
    /// The kernel cannot continue
    Fatal = 5,
}

impl LogLevel {
    /// Decodes a level byte, returning `None` for values outside the enum.
    pub const fn try_from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Debug),
            2 => Some(Self::Info),
            3 => Some(Self::Warn),
            4 => Some(Self::Error),
            5 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Decodes a level byte, saturating unknown values to `Fatal`.
    pub const fn from_u8(value: u8) -> Self {
        match Self::try_from_u8(value) {
            Some(level) => level,
            None => Self::Fatal,
        }
    }

    /// Short upper-case name used in emitted log lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::None => "NONE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// ANSI colour escape for console output.
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Fatal => "\x1b[1;31m",
            Self::Error => "\x1b[31m",
            Self::Warn => "\x1b[33m",
            Self::Info => "\x1b[37m",
            Self::Debug | Self::None => "\x1b[90m",
        }
    }

    /// ANSI reset escape.
    pub const fn reset_color_code(&self) -> &'static str {
        "\x1b[0m"
    }
}

impl core::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{kassert, test_case};

    test_case!(test_level_ordering, {
        kassert!(LogLevel::None < LogLevel::Debug);
        kassert!(LogLevel::Debug < LogLevel::Info);
        kassert!(LogLevel::Warn < LogLevel::Error);
        kassert!(LogLevel::Error < LogLevel::Fatal);
    });

    test_case!(test_level_byte_decoding, {
        for byte in 0..=5u8 {
            kassert!(LogLevel::try_from_u8(byte).unwrap() as u8 == byte);
        }
        kassert!(LogLevel::try_from_u8(6).is_none());
        kassert!(LogLevel::from_u8(200) == LogLevel::Fatal);
    });
}
