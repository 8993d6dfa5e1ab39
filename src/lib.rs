//! Storacha 去中心化存储插件
//!
//! 为 Agent 运行时提供：
//! - 存储客户端生命周期管理（[`session::StorageClient`]）
//! - `STORAGE_UPLOAD` / `STORAGE_RETRIEVE` 两个 Action
//! - 从消息文本中提取 CID 的工具函数
//!
//! 签名、委托与上传协议由实现 [`providers::UploadService`] 的 SDK 负责。

pub mod actions;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod plugin;
pub mod providers;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use actions::{Action, ResponseSink, RetrieveAction, UploadAction};
pub use config::{validate_storage_config, SettingsSource, StorageConfig};
pub use error::{Result, StorageError};
pub use plugin::{get_storage_client, StoragePlugin};
pub use session::{create_storage_client, StorageClient, StorageClientInterface};
pub use utils::{extract_cids, extract_cids_from_message};
