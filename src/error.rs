use thiserror::Error;

/// 课程列表获取错误
///
/// 凭证失效与网络故障必须区分开：前者要求调用方重新登录，
/// 后者可以原样重试。
#[derive(Debug, Error)]
pub enum RemoteError {
    /// JSESSIONID 无效或已过期
    #[error("无效或已过期的 JSESSIONID，请重新登录")]
    InvalidCredential,
    /// 网络请求失败（超时、连接中断、非 2xx 状态）
    #[error("网络请求失败: {0}")]
    Network(String),
    /// 服务返回了无法解析的响应体
    #[error("服务响应解析失败: {0}")]
    BadResponse(String),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, RemoteError>;
