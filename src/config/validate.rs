//! 配置校验

use super::settings::SettingsSource;
use super::types::{
    StorageConfig, GATEWAY_URL_KEY, STORACHA_AGENT_DELEGATION_KEY, STORACHA_AGENT_PRIVATE_KEY_KEY,
};
use crate::error::{Result, StorageError};

/// 字段级校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub key: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

fn required(
    settings: &dyn SettingsSource,
    key: &'static str,
    empty_message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match settings.get_setting(key) {
        None => {
            errors.push(FieldError {
                key,
                message: "Required".to_string(),
            });
            None
        }
        Some(value) if value.is_empty() => {
            errors.push(FieldError {
                key,
                message: empty_message.to_string(),
            });
            None
        }
        Some(value) => Some(value),
    }
}

/// 读取网关地址，去掉末尾 `/`；空字符串视为未设置
///
/// 链接按字符串拼接生成，不是绝对 http(s) 地址时只记录警告。
fn gateway(settings: &dyn SettingsSource) -> Option<String> {
    let raw = settings.get_setting(GATEWAY_URL_KEY)?;
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    match url::Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        Ok(url) => {
            tracing::warn!(
                "[StorageConfig] GATEWAY_URL uses scheme {}, links may not resolve: {}",
                url.scheme(),
                trimmed
            );
        }
        Err(e) => {
            tracing::warn!(
                "[StorageConfig] GATEWAY_URL is not an absolute url ({}), links may not resolve: {}",
                e,
                trimmed
            );
        }
    }
    Some(trimmed.to_string())
}

/// 从设置来源读取并校验存储客户端配置
///
/// 收集所有字段错误后一次性返回，错误消息格式：
/// ```text
/// Storage client configuration validation failed:
/// STORACHA_AGENT_PRIVATE_KEY: Required
/// STORACHA_AGENT_DELEGATION: Storacha agent delegation is required
/// ```
pub fn validate_storage_config(settings: &dyn SettingsSource) -> Result<StorageConfig> {
    let mut errors = Vec::new();

    let signing_key = required(
        settings,
        STORACHA_AGENT_PRIVATE_KEY_KEY,
        "Storacha agent private key is required",
        &mut errors,
    );
    let delegation = required(
        settings,
        STORACHA_AGENT_DELEGATION_KEY,
        "Storacha agent delegation is required",
        &mut errors,
    );
    let gateway_url = gateway(settings);

    match (signing_key, delegation) {
        (Some(signing_key), Some(delegation)) if errors.is_empty() => {
            let mut config = StorageConfig::new(signing_key, delegation);
            config.gateway_url = gateway_url;
            Ok(config)
        }
        _ => {
            tracing::error!(
                errors = ?errors,
                "[StorageConfig] Storage client config validation failed"
            );
            let messages = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            Err(StorageError::Configuration(format!(
                "Storage client configuration validation failed:\n{}",
                messages
            )))
        }
    }
}
