//! 日志初始化
//!
//! 宿主若已安装全局 subscriber，本函数不会覆盖。

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_LOG_FILTER: &str = "storacha_storage_plugin=info";

/// 安装 fmt subscriber；`RUST_LOG` 优先于 `default_filter`
///
/// 返回是否由本次调用完成安装。
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
