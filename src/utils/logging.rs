/// 日志工具模块
///
/// 初始化 tracing 订阅器；级别可通过 RUST_LOG 覆盖，默认 info。
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 重复调用是安全的（测试中每个用例都会调用一次）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
