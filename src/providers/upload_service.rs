//! 上传服务 SDK 接口
use async_trait::async_trait;
use cid::Cid;
use std::sync::Arc;

use super::memory_store::MemoryStore;
use crate::error::UpstreamError;
use crate::models::{DelegationProof, FileBlob, Principal, SpaceDid, UploadOptions};

/// SDK 入口：解析私钥、创建客户端、导入委托
#[async_trait]
pub trait UploadService: Send + Sync {
    /// 将 base64 编码的 ed25519 私钥解析为签名主体
    fn parse_signer(&self, signing_key: &str) -> Result<Principal, UpstreamError>;

    /// 创建绑定到签名主体和存储的客户端
    async fn create_client(
        &self,
        principal: Principal,
        store: MemoryStore,
    ) -> Result<Arc<dyn UploadClient>, UpstreamError>;

    /// 读取 CAR 字节中的全部块并导入为委托证明
    async fn import_delegation(&self, car: &[u8]) -> Result<DelegationProof, UpstreamError>;
}

/// 已认证的客户端会话
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// 签名主体的 DID
    fn agent_did(&self) -> String;

    /// 用委托证明注册存储空间
    async fn add_space(&self, proof: DelegationProof) -> Result<SpaceDid, UpstreamError>;

    /// 设置当前空间，后续上传都落在该空间
    async fn set_current_space(&self, space: &SpaceDid) -> Result<(), UpstreamError>;

    /// 当前空间
    fn current_space(&self) -> Option<SpaceDid>;

    /// 以目录形式上传一组文件，返回目录根 CID
    async fn upload_directory(
        &self,
        files: Vec<FileBlob>,
        options: UploadOptions,
    ) -> Result<Cid, UpstreamError>;
}
