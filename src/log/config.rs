//! Logging configuration

use super::area::LogArea;
use super::frame::HEADER_SIZE;
use super::level::LogLevel;

/// Global log buffer size
pub const GLOBAL_LOG_BUFFER_SIZE: usize = 16 * 1024; // 16KB

/// Maximum length of a single log message
pub const MAX_LOG_MESSAGE_LENGTH: usize = 256;

/// Largest frame a producer can commit: header plus a full message
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_LOG_MESSAGE_LENGTH;

/// Default log level
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// Early boot and kernel entry
pub const AREA_BOOT: u8 = 0;
/// Physical and virtual memory management
pub const AREA_MEMORY: u8 = 1;
/// Local and I/O APIC
pub const AREA_APIC: u8 = 2;
/// Device discovery and drivers
pub const AREA_DEVICE: u8 = 3;
/// Serial ports
pub const AREA_SERIAL: u8 = 4;
/// Scheduler and tasks
pub const AREA_TASK: u8 = 5;
/// ACPI table discovery
pub const AREA_ACPI: u8 = 6;
/// Interrupt and exception handling
pub const AREA_INTERRUPT: u8 = 7;

/// Areas registered by [`crate::log::init`].
pub const KERNEL_AREAS: &[LogArea] = &[
    LogArea::new(AREA_BOOT, "boot", DEFAULT_LOG_LEVEL),
    LogArea::new(AREA_MEMORY, "memory", LogLevel::Info),
    LogArea::new(AREA_APIC, "apic", LogLevel::Info),
    LogArea::new(AREA_DEVICE, "device", LogLevel::Info),
    LogArea::new(AREA_SERIAL, "serial", LogLevel::Warn),
    LogArea::new(AREA_TASK, "task", LogLevel::Info),
    LogArea::new(AREA_ACPI, "acpi", LogLevel::Info),
    LogArea::new(AREA_INTERRUPT, "interrupt", LogLevel::Warn),
];
