//! 配置类型定义

use serde::Serialize;
use zeroize::Zeroizing;

/// 默认检索网关
pub const DEFAULT_GATEWAY_URL: &str = "https://w3s.link";

pub const STORACHA_AGENT_PRIVATE_KEY_KEY: &str = "STORACHA_AGENT_PRIVATE_KEY";
pub const STORACHA_AGENT_DELEGATION_KEY: &str = "STORACHA_AGENT_DELEGATION";
pub const GATEWAY_URL_KEY: &str = "GATEWAY_URL";

/// 调试输出中敏感字段的占位符
pub const REDACTED_PLACEHOLDER: &str = "***REDACTED***";

/// 存储客户端配置
///
/// 每次 start 构造一次，之后不可变；stop 时丢弃。
/// 私钥保存在 [`Zeroizing`] 中，释放时清零。
#[derive(Clone)]
pub struct StorageConfig {
    /// Agent 私钥（base64 编码）
    pub signing_key: Zeroizing<String>,
    /// base64 编码的 CAR 格式委托
    pub delegation: String,
    /// 用户配置的网关（已去掉末尾的 `/`）
    pub gateway_url: Option<String>,
}

impl StorageConfig {
    pub fn new(signing_key: impl Into<String>, delegation: impl Into<String>) -> Self {
        Self {
            signing_key: Zeroizing::new(signing_key.into()),
            delegation: delegation.into(),
            gateway_url: None,
        }
    }

    pub fn with_gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = Some(gateway_url.into());
        self
    }

    /// 实际使用的网关：未配置时回退到默认网关
    pub fn gateway_url(&self) -> &str {
        self.gateway_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_GATEWAY_URL)
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("signing_key", &REDACTED_PLACEHOLDER)
            .field("delegation", &REDACTED_PLACEHOLDER)
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

/// 单个设置项的描述，供宿主展示配置界面
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDescriptor {
    pub name: &'static str,
    pub required: bool,
    pub secret: bool,
    pub default_value: Option<&'static str>,
    pub description: &'static str,
}

/// 插件配置 schema
pub fn storage_config_schema() -> Vec<SettingDescriptor> {
    vec![
        SettingDescriptor {
            name: STORACHA_AGENT_PRIVATE_KEY_KEY,
            required: true,
            secret: true,
            default_value: None,
            description: "The private key of the agent that is used to sign data before uploading to the Storacha network. \
                This is the base64 encoded private key string. \
                Create one with the Storacha CLI: `storacha agent create-private-key`.",
        },
        SettingDescriptor {
            name: STORACHA_AGENT_DELEGATION_KEY,
            required: true,
            secret: true,
            default_value: None,
            description: "The delegation that authorizes the Agent to upload data to the Storacha network. \
                This is the base64 encoded delegation string. \
                Create one with the Storacha CLI: `storacha delegation create <audience-did> --base64`.",
        },
        SettingDescriptor {
            name: GATEWAY_URL_KEY,
            required: false,
            secret: false,
            default_value: Some(DEFAULT_GATEWAY_URL),
            description: "The gateway URL to use for fetching data from the network. Defaults to https://w3s.link",
        },
    ]
}
