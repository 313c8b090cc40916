// klog/src/log/tests/global.rs
//
// The only test that touches the kernel instance.

use super::*;
use crate::log::config::{AREA_MEMORY, AREA_SERIAL};
use crate::log::{init, logger};
use crate::{pr_debug, pr_err, pr_info, pr_warn};

const TEST_AREA: u8 = 42;

test_case!(test_global_logger_and_macros, {
    let log = init(|log| log.register_area(TEST_AREA, "test", LogLevel::Debug));
    kassert!(core::ptr::eq(log, logger().unwrap()));

    // 第二次 init 直接返回已有实例
    let again = init(|_| panic!("configured twice"));
    kassert!(core::ptr::eq(log, again));

    pr_info!(AREA_MEMORY, "{} frames free", 128);
    pr_debug!(AREA_MEMORY, "filtered by the memory threshold");
    pr_warn!(AREA_SERIAL, "fifo overrun");
    pr_info!(AREA_SERIAL, "filtered by the serial threshold");
    pr_debug!(TEST_AREA, "custom area");
    pr_err!(TEST_AREA, "error {}", -5);

    let mut lines = std::vec::Vec::new();
    log.flush_with(&mut |entry| lines.push(std::format!("{}", entry)));
    kassert!(
        lines
            == [
                "[   memory] INFO : 128 frames free",
                "[   serial] WARN : fifo overrun",
                "[     test] DEBUG: custom area",
                "[     test] ERROR: error -5",
            ]
    );
});
