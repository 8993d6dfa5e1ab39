//! 用户可调用的 Action
//!
//! - `STORAGE_UPLOAD`：上传消息附件
//! - `STORAGE_RETRIEVE`：根据消息中的 CID 生成网关下载链接

pub mod retrieve;
pub mod upload;

pub use retrieve::RetrieveAction;
pub use upload::UploadAction;

use async_trait::async_trait;

use crate::config::SettingsSource;
use crate::error::{Result, StorageError, UpstreamError};
use crate::models::{ActionExample, Message, ResponseContent};

/// 宿主传入的会话状态（插件不读取）
pub type State = serde_json::Value;

/// 宿主传入的附加参数
pub type HandlerOptions = serde_json::Map<String, serde_json::Value>;

/// 回复回调
#[async_trait]
pub trait ResponseSink: Send + Sync {
    async fn respond(&self, content: ResponseContent) -> std::result::Result<(), UpstreamError>;
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    fn similes(&self) -> &'static [&'static str];

    fn description(&self) -> &'static str;

    fn examples(&self) -> &'static [&'static [ActionExample]];

    /// 检查 Action 是否可用（配置是否完整）
    async fn validate(&self, runtime: &dyn SettingsSource, message: &Message) -> Result<bool>;

    async fn handler(
        &self,
        runtime: &dyn SettingsSource,
        message: &Message,
        state: Option<&State>,
        options: &HandlerOptions,
        respond: Option<&dyn ResponseSink>,
    ) -> Result<bool>;
}

/// 发送回复，回调失败作为错误返回
pub(crate) async fn reply(
    respond: Option<&dyn ResponseSink>,
    content: ResponseContent,
) -> Result<()> {
    match respond {
        Some(sink) => sink.respond(content).await.map_err(StorageError::Upstream),
        None => Ok(()),
    }
}

/// 尽力发送回复，失败只记录日志
pub(crate) async fn reply_best_effort(
    respond: Option<&dyn ResponseSink>,
    content: ResponseContent,
) {
    if let Err(e) = reply(respond, content).await {
        tracing::warn!(error = ?e, "[Action] Failed to deliver response");
    }
}
