//! Logger tests, each on its own [`Logger`] instance unless noted.

use super::config::{MAX_FRAME_SIZE, MAX_LOG_MESSAGE_LENGTH};
use super::frame::{FrameError, FrameHeader, HEADER_SIZE};
use super::level::LogLevel;
use super::log_core::{DrainError, Logger};
pub(super) use crate::{kassert, test_case};

// ========== 测试辅助 ==========

/// Area with a Debug threshold
const CORE: u8 = 0;
/// Area with a Warn threshold
const NET: u8 = 1;
/// Never registered
const UNREGISTERED: u8 = 200;

/// 测试专用日志宏
///
/// 模拟生产宏的行为，但操作独立的 Logger 实例
macro_rules! test_log {
    ($logger:expr, $level:expr, $area:expr, $($arg:tt)*) => {
        $logger.log($level, $area, format_args!($($arg)*))
    };
}

/// Logger over `storage` with the two test areas registered.
fn test_logger(storage: &mut [u8]) -> Logger<'_> {
    let mut log = Logger::new(storage);
    log.register_area(CORE, "core", LogLevel::Debug);
    log.register_area(NET, "net", LogLevel::Warn);
    log
}

mod global;
