//! 上传服务 SDK 交互的数据模型
use bytes::Bytes;
use cid::Cid;
use serde::Serialize;
use std::sync::Arc;

/// 由私钥解析出的签名主体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// `did:key:...`
    pub did: String,
}

/// 存储空间 DID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpaceDid(pub String);

impl std::fmt::Display for SpaceDid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// CAR 中的一个块
#[derive(Debug, Clone)]
pub struct Block {
    pub cid: Cid,
    pub bytes: Bytes,
}

/// 从委托 CAR 导入的证明 DAG
#[derive(Debug, Clone)]
pub struct DelegationProof {
    pub root: Cid,
    pub blocks: Vec<Block>,
}

/// 待上传文件
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FileBlob {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// 上传进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub total: u64,
    pub loaded: u64,
}

impl UploadProgress {
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        self.loaded.min(self.total) * 100 / self.total
    }
}

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// 目录上传参数
#[derive(Clone)]
pub struct UploadOptions {
    /// 单个分片的最大重试次数
    pub retries: u32,
    /// 同时进行的请求数
    pub concurrent_requests: usize,
    /// Filecoin piece 哈希器名称，None 表示不做 Filecoin 存证
    pub piece_hasher: Option<String>,
    pub on_upload_progress: Option<ProgressCallback>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            concurrent_requests: 3,
            piece_hasher: None,
            on_upload_progress: None,
        }
    }
}

impl std::fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadOptions")
            .field("retries", &self.retries)
            .field("concurrent_requests", &self.concurrent_requests)
            .field("piece_hasher", &self.piece_hasher)
            .field("on_upload_progress", &self.on_upload_progress.is_some())
            .finish()
    }
}
