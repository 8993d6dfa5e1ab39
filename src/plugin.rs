//! 插件描述符
//!
//! 宿主通过 [`StoragePlugin`] 注册配置项、两个 Action 与存储客户端。

use std::sync::Arc;

use crate::actions::{Action, RetrieveAction, UploadAction};
use crate::config::{storage_config_schema, SettingDescriptor, SettingsSource};
use crate::error::{Result, StorageError};
use crate::providers::UploadService;
use crate::session::{StorageClient, StorageClientInterface, STORAGE_CLIENT_NAME};

pub const PLUGIN_NAME: &str = STORAGE_CLIENT_NAME;
pub const PLUGIN_DESCRIPTION: &str = "Plugin to manage files in a decentralized storage network";

pub struct StoragePlugin {
    pub name: &'static str,
    pub description: &'static str,
    pub config: Vec<SettingDescriptor>,
    pub actions: Vec<Arc<dyn Action>>,
    client: Arc<StorageClient>,
    service: Arc<dyn UploadService>,
}

impl StoragePlugin {
    /// 为宿主运行时创建插件，客户端此时尚未启动
    pub fn new(runtime: Arc<dyn SettingsSource>, service: Arc<dyn UploadService>) -> Self {
        let client = Arc::new(StorageClient::new(runtime, service.clone()));
        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(UploadAction::new(client.clone())),
            Arc::new(RetrieveAction::new()),
        ];
        Self {
            name: PLUGIN_NAME,
            description: PLUGIN_DESCRIPTION,
            config: storage_config_schema(),
            actions,
            client,
            service,
        }
    }

    /// 插件持有的生命周期管理器
    pub fn client(&self) -> Arc<StorageClient> {
        self.client.clone()
    }

    /// 客户端描述符，每次 start 创建独立实例
    pub fn client_interface(&self) -> StorageClientInterface {
        StorageClientInterface::new(self.service.clone())
    }

    pub fn action(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.iter().find(|a| a.name() == name).cloned()
    }
}

/// 在已注册的插件中查找 `storage` 插件，返回其已启动的客户端
pub async fn get_storage_client(plugins: &[StoragePlugin]) -> Result<Arc<StorageClient>> {
    let plugin = plugins
        .iter()
        .find(|p| p.name == PLUGIN_NAME)
        .ok_or(StorageError::ClientNotFound)?;
    plugin.client.ensure_started().await?;
    Ok(plugin.client())
}
