//! 配置管理模块
//!
//! 从宿主运行时的设置中读取并校验存储客户端配置：
//! - `STORACHA_AGENT_PRIVATE_KEY`：Agent 私钥（必填，敏感）
//! - `STORACHA_AGENT_DELEGATION`：base64 编码的 UCAN 委托（必填）
//! - `GATEWAY_URL`：检索网关（可选，默认 https://w3s.link）

mod settings;
mod types;
mod validate;

pub use settings::{ChainedSettings, EnvSettings, MapSettings, SettingsSource, YamlSettings};
pub use types::{
    storage_config_schema, SettingDescriptor, StorageConfig, DEFAULT_GATEWAY_URL,
    GATEWAY_URL_KEY, REDACTED_PLACEHOLDER, STORACHA_AGENT_DELEGATION_KEY,
    STORACHA_AGENT_PRIVATE_KEY_KEY,
};
pub use validate::{validate_storage_config, FieldError};
