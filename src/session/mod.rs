//! 存储会话模块
//!
//! 提供以下功能：
//! - 根据配置创建已绑定空间的认证会话
//! - 会话生命周期管理（启动、停止、访问器）
//! - 通过网关获取内容

mod client_factory;
mod storage_client;

pub use client_factory::{create_storage_client, decode_delegation, parse_delegation};
pub use storage_client::{StorageClient, StorageClientInterface, STORAGE_CLIENT_NAME};
