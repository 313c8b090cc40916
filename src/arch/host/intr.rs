//! Interrupt control stubs for targets without a kernel interrupt model
//!
//! Hosted builds (unit tests, tools) have no interrupt flag to mask, so the
//! saved state is always zero and restoring it does nothing.

/// 读取并禁用中断（返回之前的状态）
///
/// # Safety
///
/// Always safe on this target; kept `unsafe` to match the bare-metal API.
#[inline(always)]
pub unsafe fn read_and_disable_interrupts() -> usize {
    0
}

/// 恢复中断状态
///
/// # Safety
///
/// Always safe on this target; kept `unsafe` to match the bare-metal API.
#[inline(always)]
pub unsafe fn restore_interrupts(_flags: usize) {}

/// Hosted builds never run with interrupts in the kernel sense.
#[inline(always)]
pub fn are_interrupts_enabled() -> bool {
    false
}
