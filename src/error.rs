//! 错误类型定义
//!
//! 插件内所有可失败操作统一返回 [`StorageError`]。
//! SDK 返回的错误以 [`UpstreamError`] 原样包裹，不改写其消息与 source 链。

use thiserror::Error;

/// 外部 SDK / 网络层返回的原始错误
pub type UpstreamError = Box<dyn std::error::Error + Send + Sync>;

/// 插件统一 Result 类型
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// 配置缺失或非法（需要用户重新配置）
    #[error("{0}")]
    Configuration(String),

    /// 缺少 Agent 私钥
    #[error("Agent private key is missing from the storage client configuration")]
    MissingCredential,

    /// 缺少 Agent 委托
    #[error("Agent delegation is missing from the storage client configuration")]
    MissingDelegation,

    /// 委托不是合法的 base64 字符串
    #[error("Agent delegation is not valid base64: {0}")]
    InvalidDelegation(#[source] base64::DecodeError),

    /// 在 start 之前访问客户端
    #[error("Storage client not initialized")]
    NotInitialized,

    /// 重复调用 start
    #[error("Storage client already initialized")]
    AlreadyInitialized,

    /// 运行时中没有注册 storage 插件客户端
    #[error("Storage client not found in runtime")]
    ClientNotFound,

    /// SDK 返回的错误
    #[error(transparent)]
    Upstream(UpstreamError),

    /// 读取附件失败
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 网关请求失败
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl StorageError {
    /// 包裹 SDK 错误
    pub fn upstream(err: impl Into<UpstreamError>) -> Self {
        Self::Upstream(err.into())
    }

    /// 是否为配置类错误（用户需要修改设置）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::MissingCredential | Self::MissingDelegation
        )
    }
}
