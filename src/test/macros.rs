//! Kernel-style test macros, hosted on the standard test harness.

/// 判断条件是否为真，否则让当前测试失败并打印条件原文。
#[macro_export]
macro_rules! kassert {
    ($cond:expr) => {
        assert!($cond, "kassert failed: {}", stringify!($cond))
    };
    ($cond:expr, $($arg:tt)+) => {
        assert!($cond, $($arg)+)
    };
}

/// 定义一个标准的测试用例。
///
/// `test_case!(test_name, { code });`
#[macro_export]
macro_rules! test_case {
    ($func_name:ident, $body:block) => {
        #[test]
        fn $func_name() $body
    };
}
