//! Local interrupt flag control on x86_64

use core::arch::asm;

/// Interrupt enable flag in RFLAGS
pub const RFLAGS_IF: usize = 1 << 9;

/// Reads RFLAGS and clears the interrupt flag, returning the previous RFLAGS.
///
/// # Safety
///
/// Must run at CPL 0. The returned value must be handed back to
/// [`restore_interrupts`] on the same CPU.
#[inline(always)]
pub unsafe fn read_and_disable_interrupts() -> usize {
    let flags: usize;
    unsafe {
        asm!("pushfq", "pop {}", "cli", out(reg) flags);
    }
    flags
}

/// Restores the interrupt flag saved by [`read_and_disable_interrupts`].
///
/// # Safety
///
/// `flags` must come from [`read_and_disable_interrupts`] on this CPU.
#[inline(always)]
pub unsafe fn restore_interrupts(flags: usize) {
    if flags & RFLAGS_IF != 0 {
        unsafe {
            asm!("sti", options(nomem, nostack));
        }
    }
}

/// Returns whether maskable interrupts are currently enabled.
#[allow(dead_code)]
#[inline(always)]
pub fn are_interrupts_enabled() -> bool {
    let flags: usize;
    unsafe {
        asm!("pushfq", "pop {}", out(reg) flags, options(preserves_flags));
    }
    flags & RFLAGS_IF != 0
}
