//! Logging macros
//!
//! Linux kernel-style `pr_*` macros that log to the kernel logger set up by
//! [`crate::log::init`]. Every macro takes an area key first:
//!
//! ```rust,ignore
//! use klog::log::{AREA_MEMORY, AREA_APIC};
//!
//! pr_info!(AREA_MEMORY, "{} frames free", free);
//! pr_err!(AREA_APIC, "timer calibration failed");
//! ```
//!
//! # Performance
//!
//! The area threshold is checked before the arguments are formatted, so a
//! disabled record costs a table lookup. Before `init` every macro is a
//! no-op.

/// Internal implementation macro with level filtering
#[doc(hidden)]
#[macro_export]
macro_rules! __log_impl_filtered {
    ($level:expr, $area:expr, $args:expr) => {{
        let area: u8 = $area;
        if $crate::log::is_enabled($level, area) {
            $crate::log::log_impl($level, area, $args);
        }
    }};
}

/// Logs a message at the DEBUG level
///
/// # Examples
///
/// ```rust,ignore
/// pr_debug!(AREA_TASK, "switch {} -> {}", prev, next);
/// ```
#[macro_export]
macro_rules! pr_debug {
    ($area:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Debug,
            $area,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the INFO level
#[macro_export]
macro_rules! pr_info {
    ($area:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Info,
            $area,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the WARN level
#[macro_export]
macro_rules! pr_warn {
    ($area:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Warn,
            $area,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the ERROR level
///
/// # Examples
///
/// ```rust,ignore
/// pr_err!(AREA_DEVICE, "probe of {} failed: {:?}", name, err);
/// ```
#[macro_export]
macro_rules! pr_err {
    ($area:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Error,
            $area,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the FATAL level
///
/// The record goes through the immediate callback as well when one is
/// installed, so it reaches the console even if nothing drains the buffer.
#[macro_export]
macro_rules! pr_fatal {
    ($area:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Fatal,
            $area,
            format_args!($($arg)*)
        )
    }
}
