//! Consumer side helpers
//!
//! The kernel runs one logger task that sleeps until a producer's notify
//! callback wakes it, then writes everything buffered to the console.

use core::fmt::Write;
use core::ops::ControlFlow;

use super::config::MAX_FRAME_SIZE;
use super::log_core::{DrainError, Logger};

/// Writes every buffered record to `out`, one line each, and returns how
/// many were written.
///
/// Stops early if `out` fails; the record that failed is lost.
pub fn drain_into(logger: &Logger<'_>, out: &mut impl Write) -> usize {
    let mut scratch = [0u8; MAX_FRAME_SIZE];
    let mut count = 0;
    while let Ok(entry) = logger.read(&mut scratch) {
        count += 1;
        if writeln!(out, "{}", entry).is_err() {
            break;
        }
    }
    count
}

/// Body of the logger task.
///
/// Drains to `out`, then calls `idle` whenever the buffer is empty. `idle`
/// blocks until there is work (or just spins) and returns
/// [`ControlFlow::Break`] to stop the task. A corrupt buffer ends the task
/// with an error.
pub fn logger_task(
    logger: &Logger<'_>,
    out: &mut impl Write,
    mut idle: impl FnMut() -> ControlFlow<()>,
) -> Result<(), DrainError> {
    loop {
        drain_into(logger, out);
        if let Some(err) = logger.corruption() {
            return Err(DrainError::Corrupt(err));
        }
        if logger.has_log() {
            continue;
        }
        if idle().is_break() {
            return Ok(());
        }
    }
}
