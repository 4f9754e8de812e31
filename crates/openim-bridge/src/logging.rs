//! 日志初始化
//!
//! SDK 的 logLevel 约定：6 = 全部，5 = debug，4 = info，3 = warn，其余 = error。

use tracing::Level;

pub fn level_from_sdk(log_level: i64) -> Level {
    match log_level {
        l if l >= 6 => Level::TRACE,
        5 => Level::DEBUG,
        4 => Level::INFO,
        3 => Level::WARN,
        _ => Level::ERROR,
    }
}

/// 安装 fmt subscriber，返回是否由本次调用安装
///
/// 宿主进程可能已经装过全局 subscriber，重复调用不会报错。
pub fn init_logging(log_level: i64) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level_from_sdk(log_level))
        .with_target(false)
        .try_init()
        .is_ok()
}
