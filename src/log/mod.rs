//! Kernel logging
//!
//! Producers format straight into a lock-protected bip buffer as
//! self-describing frames; a single consumer drains them later. Each record
//! belongs to an area whose threshold is checked before any work happens.
//!
//! ```text
//! pr_info!(area, ...) ─► Logger::log ─► BipBuffer ─► Logger::drain / flush ─► sink
//!                              └──────► immediate callback (optional)
//! ```
//!
//! The kernel instance is created once with [`init`] and reached through
//! [`logger`] or the `pr_*` macros. Independent [`Logger`] values can be
//! built over any byte slice.

pub mod area;
pub mod buffer;
pub mod config;
pub mod entry;
pub mod frame;
pub mod level;
mod log_core;
pub mod macros;
pub mod task;

pub use area::{AreaRegistry, LogArea};
pub use buffer::{BipBuffer, BipError};
pub use config::*;
pub use entry::LogEntry;
pub use frame::{FrameError, FrameHeader, HEADER_SIZE};
pub use level::LogLevel;
pub use log_core::{DrainError, FlushFn, ImmediateFn, Logger, NotifyFn};

use core::ptr::addr_of_mut;

use spin::Once;

static LOGGER: Once<Logger<'static>> = Once::new();

static mut GLOBAL_LOG_STORAGE: [u8; GLOBAL_LOG_BUFFER_SIZE] = [0; GLOBAL_LOG_BUFFER_SIZE];

/// Initializes the kernel logger over the static log buffer.
///
/// The kernel areas are registered first; `configure` can then add areas
/// and callbacks before the logger is published. Later calls return the
/// existing instance without running `configure`.
pub fn init(configure: impl FnOnce(&mut Logger<'static>)) -> &'static Logger<'static> {
    LOGGER.call_once(|| {
        // SAFETY: `call_once` runs this closure at most once, so this is the
        // only reference ever created to the storage.
        let storage = unsafe { &mut *addr_of_mut!(GLOBAL_LOG_STORAGE) };
        let mut logger = Logger::new(storage);
        logger.register_areas(KERNEL_AREAS);
        configure(&mut logger);
        logger
    })
}

/// The kernel logger, if [`init`] has run.
#[inline]
pub fn logger() -> Option<&'static Logger<'static>> {
    LOGGER.get()
}

/// Backend of the `pr_*` macros.
#[doc(hidden)]
pub fn log_impl(level: LogLevel, area: u8, args: core::fmt::Arguments<'_>) {
    if let Some(logger) = logger() {
        logger.log(level, area, args);
    }
}

/// Whether the kernel logger would accept a record, used by the `pr_*`
/// macros to skip formatting.
#[doc(hidden)]
#[inline]
pub fn is_enabled(level: LogLevel, area: u8) -> bool {
    logger().is_some_and(|logger| logger.is_enabled(level, area))
}

#[cfg(test)]
mod tests;
