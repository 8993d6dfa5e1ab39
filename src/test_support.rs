//! 测试辅助：可编排失败点的上传服务 mock 与记录回复的回调

use async_trait::async_trait;
use cid::Cid;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::actions::ResponseSink;
use crate::config::{
    MapSettings, GATEWAY_URL_KEY, STORACHA_AGENT_DELEGATION_KEY, STORACHA_AGENT_PRIVATE_KEY_KEY,
};
use crate::error::UpstreamError;
use crate::models::{
    DelegationProof, FileBlob, Principal, ResponseContent, SpaceDid, UploadOptions,
};
use crate::providers::{MemoryStore, UploadClient, UploadService};

pub const ROOT_CID: &str = "bafybeicjujpz73x277wk2d6ngdcq3sjtdt7ywvpm4u666yufycpbpzxv24";
pub const PROOF_CID: &str = "bafkreibm6jg3ux5qumhcn2b3flc3tyu6dmlb4xa7u5bf44yegnrjhc4yeq";
pub const SPACE_DID: &str = "did:key:z6MkSpaceTest";
/// base64("car-bytes")
pub const DELEGATION_B64: &str = "Y2FyLWJ5dGVz";

pub fn settings() -> MapSettings {
    MapSettings::new()
        .with(STORACHA_AGENT_PRIVATE_KEY_KEY, "MgCYtest-private-key")
        .with(STORACHA_AGENT_DELEGATION_KEY, DELEGATION_B64)
}

pub fn settings_with_gateway(gateway: &str) -> MapSettings {
    settings().with(GATEWAY_URL_KEY, gateway)
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub files: Vec<FileBlob>,
    pub retries: u32,
    pub concurrent_requests: usize,
    pub piece_hasher: Option<String>,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<String>>,
    fail_at: Option<&'static str>,
    uploads: Mutex<Vec<RecordedUpload>>,
    current_space: Mutex<Option<SpaceDid>>,
}

impl MockState {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn check(&self, step: &'static str) -> Result<(), UpstreamError> {
        if self.fail_at == Some(step) {
            return Err(format!("{} failed", step).into());
        }
        Ok(())
    }
}

/// 按调用顺序记录 SDK 调用，并可在指定步骤返回错误
#[derive(Clone, Default)]
pub struct MockUploadService {
    state: Arc<MockState>,
}

impl MockUploadService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在指定步骤失败：parse_signer / create_client / import_delegation /
    /// add_space / set_current_space / upload_directory
    pub fn failing_at(step: &'static str) -> Self {
        Self {
            state: Arc::new(MockState {
                fail_at: Some(step),
                ..Default::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.uploads.lock().clone()
    }
}

#[async_trait]
impl UploadService for MockUploadService {
    fn parse_signer(&self, signing_key: &str) -> Result<Principal, UpstreamError> {
        self.state.record(format!("parse_signer:{}", signing_key));
        self.state.check("parse_signer")?;
        Ok(Principal {
            did: "did:key:z6MkAgentTest".to_string(),
        })
    }

    async fn create_client(
        &self,
        principal: Principal,
        store: MemoryStore,
    ) -> Result<Arc<dyn UploadClient>, UpstreamError> {
        self.state.record("create_client");
        self.state.check("create_client")?;
        store.save("principal", serde_json::json!(principal.did));
        Ok(Arc::new(MockUploadClient {
            state: self.state.clone(),
            principal,
        }))
    }

    async fn import_delegation(&self, car: &[u8]) -> Result<DelegationProof, UpstreamError> {
        self.state
            .record(format!("import_delegation:{}", String::from_utf8_lossy(car)));
        self.state.check("import_delegation")?;
        Ok(DelegationProof {
            root: Cid::try_from(PROOF_CID)?,
            blocks: Vec::new(),
        })
    }
}

pub struct MockUploadClient {
    state: Arc<MockState>,
    principal: Principal,
}

#[async_trait]
impl UploadClient for MockUploadClient {
    fn agent_did(&self) -> String {
        self.principal.did.clone()
    }

    async fn add_space(&self, proof: DelegationProof) -> Result<SpaceDid, UpstreamError> {
        self.state.record(format!("add_space:{}", proof.root));
        self.state.check("add_space")?;
        Ok(SpaceDid(SPACE_DID.to_string()))
    }

    async fn set_current_space(&self, space: &SpaceDid) -> Result<(), UpstreamError> {
        self.state.record(format!("set_current_space:{}", space));
        self.state.check("set_current_space")?;
        *self.state.current_space.lock() = Some(space.clone());
        Ok(())
    }

    fn current_space(&self) -> Option<SpaceDid> {
        self.state.current_space.lock().clone()
    }

    async fn upload_directory(
        &self,
        files: Vec<FileBlob>,
        options: UploadOptions,
    ) -> Result<Cid, UpstreamError> {
        self.state.record(format!("upload_directory:{}", files.len()));
        if let Some(progress) = &options.on_upload_progress {
            let total = files.iter().map(|f| f.size() as u64).sum();
            (progress.as_ref())(crate::models::UploadProgress { total, loaded: total });
        }
        self.state.uploads.lock().push(RecordedUpload {
            files,
            retries: options.retries,
            concurrent_requests: options.concurrent_requests,
            piece_hasher: options.piece_hasher.clone(),
        });
        self.state.check("upload_directory")?;
        Ok(Cid::try_from(ROOT_CID)?)
    }
}

/// 记录所有回复；`fail_first` 时第一次回复返回错误（不记录）
#[derive(Default)]
pub struct RecordingSink {
    responses: Mutex<Vec<ResponseContent>>,
    fail_first: bool,
    attempts: Mutex<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first() -> Self {
        Self {
            fail_first: true,
            ..Default::default()
        }
    }

    pub fn responses(&self) -> Vec<ResponseContent> {
        self.responses.lock().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn respond(&self, content: ResponseContent) -> Result<(), UpstreamError> {
        let attempt = {
            let mut attempts = self.attempts.lock();
            *attempts += 1;
            *attempts
        };
        if self.fail_first && attempt == 1 {
            return Err("chat channel closed".into());
        }
        self.responses.lock().push(content);
        Ok(())
    }
}

/// 捕获当前线程的日志输出（需配合单线程 `#[tokio::test]`）
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// 安装为当前线程的默认 subscriber，guard 释放后恢复
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let make_writer = {
            let capture = self.clone();
            move || capture.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_target(false)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
