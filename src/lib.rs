//! Kernel log transport
//!
//! Buffered, area-filtered logging for a bare-metal kernel: producers on any
//! CPU or in interrupt context format records into a shared bip buffer and a
//! logger task drains them to the serial console.
//!
//! Builds `no_std`; host unit tests link std.

#![cfg_attr(not(test), no_std)]

mod arch;
pub mod console;
pub mod log;
pub mod sync;

#[cfg(test)]
mod test;
