//! 串口控制台
//!
//! 16550 UART 上的日志输出：裸机 x86_64 通过 I/O 端口访问（COM1 为 [`COM1`]），
//! 其他目标使用 MMIO。未初始化时输出被丢弃。

use core::fmt::{self, Write};

use spin::Once;

use crate::log::LogEntry;
use crate::sync::SpinLock;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
type Port = uart_16550::SerialPort;

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
type Port = uart_16550::MmioSerialPort;

/// 第一个 PC 串口的 I/O 基地址
pub const COM1: u16 = 0x3F8;

static SERIAL: Once<SpinLock<Port>> = Once::new();

/// 通过 I/O 端口初始化控制台串口，通常传入 [`COM1`]
///
/// # Safety
///
/// `port` 必须是 16550 兼容串口的 I/O 基地址，且没有其他代码访问该设备。
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub unsafe fn init(port: u16) {
    SERIAL.call_once(|| {
        let mut serial = unsafe { uart_16550::SerialPort::new(port) };
        serial.init();
        SpinLock::new(serial)
    });
}

/// 初始化 MMIO 控制台串口
///
/// # Safety
///
/// `base` 必须是已映射的 16550 MMIO 寄存器基地址，且没有其他代码访问该设备。
#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
pub unsafe fn init(base: usize) {
    SERIAL.call_once(|| {
        let mut serial = unsafe { uart_16550::MmioSerialPort::new(base) };
        serial.init();
        SpinLock::new(serial)
    });
}

/// 控制台输出结构体（实现 Write trait）
pub struct Console;

impl Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match SERIAL.get() {
            Some(serial) => serial.lock().write_str(s),
            None => Ok(()),
        }
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        // 整行在一个锁内输出，防止多 CPU 交错
        match SERIAL.get() {
            Some(serial) => serial.lock().write_fmt(args),
            None => Ok(()),
        }
    }
}

/// 带颜色输出一条日志，可直接用作立即回调或 flush 回调
pub fn print_entry(entry: &LogEntry<'_>) {
    let level = entry.level();
    let _ = writeln!(
        Console,
        "{}[{:>9}] {:<5}: {}{}",
        level.color_code(),
        entry.area_name(),
        level.as_str(),
        entry.message(),
        level.reset_color_code()
    );
}
