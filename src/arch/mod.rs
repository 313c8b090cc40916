//! Architecture support
//!
//! The logger only needs one thing from the architecture: saving and
//! masking the local interrupt flag around its spin lock. Bare-metal x86_64
//! gets the real implementation; every other target (including hosted test
//! builds) gets a no-op.

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
mod x86_64;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub use self::x86_64::intr;

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
mod host;

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
pub use self::host::intr;
