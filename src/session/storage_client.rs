//! 存储客户端生命周期管理
//!
//! 状态机：`NotInitialized` ⇄ `Initialized { session, config }`。
//! 状态由一把异步互斥锁保护，start / stop / ensure_started 不会交错执行。
//!
//! 重复 start 视为调用方错误，返回 [`StorageError::AlreadyInitialized`]；
//! 需要"未启动则启动"语义的调用方使用 [`StorageClient::ensure_started`]。

use std::sync::Arc;
use tokio::sync::Mutex;

use super::client_factory::create_storage_client;
use crate::config::{validate_storage_config, SettingsSource, StorageConfig, DEFAULT_GATEWAY_URL};
use crate::error::{Result, StorageError};
use crate::providers::{UploadClient, UploadService};
use crate::utils::gateway_link;

/// 客户端名称，宿主按此名称查找
pub const STORAGE_CLIENT_NAME: &str = "storage";

enum LifecycleState {
    NotInitialized,
    Initialized {
        session: Arc<dyn UploadClient>,
        config: StorageConfig,
    },
}

impl LifecycleState {
    fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized { .. })
    }
}

/// 存储客户端生命周期管理器
///
/// 持有唯一的认证会话；Action 通过它访问会话，不自行创建。
pub struct StorageClient {
    runtime: Arc<dyn SettingsSource>,
    service: Arc<dyn UploadService>,
    state: Mutex<LifecycleState>,
    http: reqwest::Client,
}

impl StorageClient {
    pub fn new(runtime: Arc<dyn SettingsSource>, service: Arc<dyn UploadService>) -> Self {
        Self {
            runtime,
            service,
            state: Mutex::new(LifecycleState::NotInitialized),
            http: reqwest::Client::new(),
        }
    }

    /// 使用自定义 HTTP 客户端（超时、代理等）
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// 启动客户端：校验配置并创建会话
    ///
    /// 失败时状态保持 `NotInitialized`，返回原始错误。
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.is_initialized() {
            let err = StorageError::AlreadyInitialized;
            tracing::error!(error = ?err, "[StorageClient] ❌ Storage client failed to start");
            return Err(err);
        }
        self.initialize(&mut state).await.map(|_| ())
    }

    /// 返回会话，未启动时先启动
    pub async fn ensure_started(&self) -> Result<Arc<dyn UploadClient>> {
        let mut state = self.state.lock().await;
        if let LifecycleState::Initialized { session, .. } = &*state {
            return Ok(session.clone());
        }
        self.initialize(&mut state).await
    }

    async fn initialize(&self, state: &mut LifecycleState) -> Result<Arc<dyn UploadClient>> {
        let result = async {
            let config = validate_storage_config(self.runtime.as_ref())?;
            let session = create_storage_client(self.service.as_ref(), &config).await?;
            Ok::<_, StorageError>((session, config))
        }
        .await;

        match result {
            Ok((session, config)) => {
                *state = LifecycleState::Initialized {
                    session: session.clone(),
                    config,
                };
                tracing::info!("[StorageClient] ✅ Storage client successfully started");
                Ok(session)
            }
            Err(e) => {
                tracing::error!(error = ?e, "[StorageClient] ❌ Storage client failed to start");
                Err(e)
            }
        }
    }

    /// 释放会话与配置；未启动时无操作
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if state.is_initialized() {
            tracing::info!("[StorageClient] Storage client stopped");
        }
        *state = LifecycleState::NotInitialized;
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.is_initialized()
    }

    /// 当前会话
    pub async fn session(&self) -> Result<Arc<dyn UploadClient>> {
        match &*self.state.lock().await {
            LifecycleState::Initialized { session, .. } => Ok(session.clone()),
            LifecycleState::NotInitialized => Err(StorageError::NotInitialized),
        }
    }

    /// 当前配置
    pub async fn config(&self) -> Result<StorageConfig> {
        match &*self.state.lock().await {
            LifecycleState::Initialized { config, .. } => Ok(config.clone()),
            LifecycleState::NotInitialized => Err(StorageError::NotInitialized),
        }
    }

    /// 网关地址，未启动时返回默认网关
    pub async fn gateway_url(&self) -> String {
        match &*self.state.lock().await {
            LifecycleState::Initialized { config, .. } => config.gateway_url().to_string(),
            LifecycleState::NotInitialized => DEFAULT_GATEWAY_URL.to_string(),
        }
    }

    /// 通过网关获取内容，返回原始响应（不检查状态码）
    pub async fn fetch_content(&self, cid: &str) -> Result<reqwest::Response> {
        let url = gateway_link(&self.gateway_url().await, cid);
        tracing::debug!("[StorageClient] Fetching {}", url);
        Ok(self.http.get(&url).send().await?)
    }
}

/// 客户端描述符：`name = "storage"`，start 时为给定运行时创建并启动新实例
#[derive(Clone)]
pub struct StorageClientInterface {
    service: Arc<dyn UploadService>,
}

impl StorageClientInterface {
    pub fn new(service: Arc<dyn UploadService>) -> Self {
        Self { service }
    }

    pub fn name(&self) -> &'static str {
        STORAGE_CLIENT_NAME
    }

    pub async fn start(&self, runtime: Arc<dyn SettingsSource>) -> Result<Arc<StorageClient>> {
        let client = Arc::new(StorageClient::new(runtime, self.service.clone()));
        client.start().await?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapSettings;
    use crate::test_support::{settings, settings_with_gateway, MockUploadService, SPACE_DID};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_with(settings: MapSettings, service: MockUploadService) -> StorageClient {
        StorageClient::new(Arc::new(settings), Arc::new(service))
    }

    #[tokio::test]
    async fn test_not_initialized_accessors() {
        let client = client_with(settings(), MockUploadService::new());

        assert!(!client.is_initialized().await);
        assert!(matches!(
            client.session().await.err(),
            Some(StorageError::NotInitialized)
        ));
        assert!(matches!(
            client.config().await.err(),
            Some(StorageError::NotInitialized)
        ));
        assert_eq!(client.gateway_url().await, DEFAULT_GATEWAY_URL);
    }

    #[tokio::test]
    async fn test_start_then_stop() {
        let service = MockUploadService::new();
        let client = client_with(
            settings_with_gateway("https://gateway.example.com"),
            service.clone(),
        );

        client.start().await.unwrap();
        assert!(client.is_initialized().await);
        assert_eq!(client.gateway_url().await, "https://gateway.example.com");
        assert_eq!(
            client.session().await.unwrap().current_space().unwrap().0,
            SPACE_DID
        );
        assert_eq!(
            client.config().await.unwrap().gateway_url(),
            "https://gateway.example.com"
        );

        client.stop().await;
        assert!(!client.is_initialized().await);
        assert!(client.session().await.is_err());
        assert!(client.config().await.is_err());
        assert_eq!(client.gateway_url().await, DEFAULT_GATEWAY_URL);

        // 重复 stop 无副作用
        client.stop().await;
        assert!(!client.is_initialized().await);
    }

    #[tokio::test]
    async fn test_default_gateway_after_start() {
        let client = client_with(settings(), MockUploadService::new());
        client.start().await.unwrap();
        assert_eq!(client.gateway_url().await, DEFAULT_GATEWAY_URL);
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let service = MockUploadService::new();
        let client = client_with(settings(), service.clone());

        client.start().await.unwrap();
        let err = client.start().await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyInitialized));
        // 第二次 start 不会重新创建会话
        assert_eq!(service.count("create_client"), 1);
        assert!(client.is_initialized().await);
    }

    #[tokio::test]
    async fn test_failed_start_stays_not_initialized() {
        let client = client_with(settings(), MockUploadService::failing_at("add_space"));
        let err = client.start().await.unwrap_err();
        assert_eq!(err.to_string(), "add_space failed");
        assert!(!client.is_initialized().await);
    }

    #[tokio::test]
    async fn test_start_with_invalid_config() {
        let service = MockUploadService::new();
        let client = client_with(MapSettings::new(), service.clone());
        let err = client.start().await.unwrap_err();
        assert!(err.is_configuration());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_started_reuses_session() {
        let service = MockUploadService::new();
        let client = client_with(settings(), service.clone());

        let first = client.ensure_started().await.unwrap();
        let second = client.ensure_started().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.count("create_client"), 1);

        // start 仍然是严格语义
        assert!(matches!(
            client.start().await.unwrap_err(),
            StorageError::AlreadyInitialized
        ));
    }

    #[tokio::test]
    async fn test_concurrent_ensure_started_creates_one_session() {
        let service = MockUploadService::new();
        let client = Arc::new(client_with(settings(), service.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.ensure_started().await.map(|_| ()) })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(service.count("create_client"), 1);
    }

    #[tokio::test]
    async fn test_fetch_content_uses_configured_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipfs/bafkreitest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("file contents"))
            .mount(&server)
            .await;

        let client = client_with(settings_with_gateway(&server.uri()), MockUploadService::new());
        client.start().await.unwrap();

        let response = client.fetch_content("bafkreitest").await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "file contents");
    }

    #[tokio::test]
    async fn test_fetch_content_returns_raw_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_with(settings_with_gateway(&server.uri()), MockUploadService::new());
        client.start().await.unwrap();

        let response = client.fetch_content("bafkreimissing").await.unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_fetch_content_network_error() {
        // 未监听的端口
        let client = client_with(
            settings_with_gateway("http://127.0.0.1:9"),
            MockUploadService::new(),
        );
        client.start().await.unwrap();
        let err = client.fetch_content("bafkreitest").await.unwrap_err();
        assert!(matches!(err, StorageError::Http(_)));
    }

    #[tokio::test]
    async fn test_interface_starts_fresh_instance() {
        let service = Arc::new(MockUploadService::new());
        let interface = StorageClientInterface::new(service.clone());
        assert_eq!(interface.name(), "storage");

        let client = interface.start(Arc::new(settings())).await.unwrap();
        assert!(client.is_initialized().await);

        let err = interface.start(Arc::new(MapSettings::new())).await.err().unwrap();
        assert!(err.is_configuration());
    }
}
