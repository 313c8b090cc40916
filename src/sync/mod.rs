//! 同步原语
//!
//! Interrupt-safe spin locking for the log transport. The logger's single
//! lock is taken from interrupt handlers as well as from ordinary kernel
//! code, so acquiring it masks local interrupts for the duration of the
//! critical section.
mod raw_spin_lock;

pub use raw_spin_lock::*;
