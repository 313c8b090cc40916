//! Raw spin lock implementing `lock_api::RawMutex`
//!
//! The lock saves and masks the local interrupt state on acquisition and
//! restores it on release, so an interrupt handler that logs cannot spin
//! forever on a lock held by the code it interrupted on the same CPU.
//!
//! [`SpinLock`] is the `lock_api::Mutex` built on top of it and is what the
//! rest of the crate uses.

use crate::arch::intr::{read_and_disable_interrupts, restore_interrupts};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 自旋锁结构体，不返回 Guard，集成了中断状态保存与恢复功能。
pub struct RawSpinLock {
    locked: AtomicBool,
    saved_intr_flags: AtomicUsize,
}

impl RawSpinLock {
    /// Creates an unlocked lock.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
            saved_intr_flags: AtomicUsize::new(0),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl lock_api::RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = lock_api::GuardNoSend;

    fn lock(&self) {
        let flags = unsafe { read_and_disable_interrupts() };

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }

        self.saved_intr_flags.store(flags, Ordering::Relaxed);
    }

    fn try_lock(&self) -> bool {
        let flags = unsafe { read_and_disable_interrupts() };

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.saved_intr_flags.store(flags, Ordering::Relaxed);
            true
        } else {
            unsafe { restore_interrupts(flags) };
            false
        }
    }

    unsafe fn unlock(&self) {
        // Read the flags before the release store; the next owner overwrites them.
        let flags = self.saved_intr_flags.load(Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
        unsafe { restore_interrupts(flags) };
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// Interrupt-safe spin mutex.
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::intr::are_interrupts_enabled;
    use crate::{kassert, test_case};
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    test_case!(test_spin_lock_basic_lock_unlock, {
        let lock = SpinLock::new(0u32);
        kassert!(!lock.is_locked());

        let guard = lock.lock();
        kassert!(lock.is_locked());

        drop(guard);
        kassert!(!lock.is_locked());
    });

    test_case!(test_spin_lock_try_lock_while_held, {
        let lock = SpinLock::new(());
        let guard = lock.lock();
        kassert!(lock.try_lock().is_none());
        drop(guard);
        kassert!(lock.try_lock().is_some());
    });

    test_case!(test_spin_lock_masks_interrupts_while_held, {
        let lock = SpinLock::new(());
        let guard = lock.lock();
        kassert!(!are_interrupts_enabled());
        drop(guard);
    });

    test_case!(test_spin_lock_mutual_exclusion, {
        let lock = Arc::new(SpinLock::new(0usize));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        *lock.lock() += 1;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        kassert!(*lock.lock() == 4000);
    });
}
