//! Log area registry
//!
//! Every log call names an *area*: a one-byte key for the subsystem that
//! produced it. The registry maps each key to a display name and the minimum
//! severity that area records.
//!
//! Names are written only through `&mut self`, i.e. while the logger is still
//! being built on the boot CPU. Thresholds live in atomics so that the hot
//! path can read them without the logger lock and so they can still be tuned
//! at runtime.

use core::sync::atomic::{AtomicU8, Ordering};

use super::level::LogLevel;

/// Number of distinct area keys
pub const NUM_AREAS: usize = 1 << u8::BITS;

/// Placeholder name reported for unregistered areas
pub const UNKNOWN_AREA_NAME: &str = "?";

/// One row of the compile-time area table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogArea {
    /// Area key used at call sites
    pub key: u8,
    /// Display name
    pub name: &'static str,
    /// Minimum severity recorded for this area
    pub level: LogLevel,
}

impl LogArea {
    /// Creates an area description.
    pub const fn new(key: u8, name: &'static str, level: LogLevel) -> Self {
        Self { key, name, level }
    }
}

/// Fixed table of all 256 possible areas.
pub struct AreaRegistry {
    names: [Option<&'static str>; NUM_AREAS],
    levels: [AtomicU8; NUM_AREAS],
}

impl AreaRegistry {
    /// Creates a registry in which every area is unregistered and silent.
    pub const fn new() -> Self {
        Self {
            names: [None; NUM_AREAS],
            levels: [const { AtomicU8::new(LogLevel::None as u8) }; NUM_AREAS],
        }
    }

    /// Registers (or re-registers) an area. The last registration wins.
    pub fn register(&mut self, area: u8, name: &'static str, level: LogLevel) {
        self.names[area as usize] = Some(name);
        *self.levels[area as usize].get_mut() = level as u8;
    }

    /// Registers every row of an area table.
    pub fn register_all(&mut self, areas: &[LogArea]) {
        for area in areas {
            self.register(area.key, area.name, area.level);
        }
    }

    /// Minimum severity for `area`; `LogLevel::None` if it was never registered.
    #[inline(always)]
    pub fn threshold(&self, area: u8) -> LogLevel {
        LogLevel::from_u8(self.levels[area as usize].load(Ordering::Relaxed))
    }

    /// Changes the threshold of an area after init.
    pub fn set_threshold(&self, area: u8, level: LogLevel) {
        self.levels[area as usize].store(level as u8, Ordering::Relaxed);
    }

    /// Whether a record of `level` in `area` passes the filter.
    #[inline(always)]
    pub fn is_enabled(&self, level: LogLevel, area: u8) -> bool {
        let limit = self.threshold(area);
        limit != LogLevel::None && level >= limit
    }

    /// Display name of `area`, or [`UNKNOWN_AREA_NAME`].
    pub fn name(&self, area: u8) -> &'static str {
        self.names[area as usize].unwrap_or(UNKNOWN_AREA_NAME)
    }

    /// Whether `area` has a registered name.
    pub fn is_registered(&self, area: u8) -> bool {
        self.names[area as usize].is_some()
    }
}

impl Default for AreaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
