//! 设置来源
//!
//! 插件只依赖 [`SettingsSource::get_setting`]，不关心宿主运行时的具体类型。

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, StorageError};

/// 宿主运行时的设置读取接口
pub trait SettingsSource: Send + Sync {
    /// 读取设置项，不存在时返回 None
    fn get_setting(&self, key: &str) -> Option<String>;
}

impl<T: SettingsSource + ?Sized> SettingsSource for Arc<T> {
    fn get_setting(&self, key: &str) -> Option<String> {
        (**self).get_setting(key)
    }
}

/// 从进程环境变量读取
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// 内存中的设置表
#[derive(Debug, Default, Clone)]
pub struct MapSettings {
    values: HashMap<String, String>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

impl SettingsSource for MapSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 从扁平 YAML 文件读取
///
/// ```yaml
/// STORACHA_AGENT_PRIVATE_KEY: "MgCa..."
/// STORACHA_AGENT_DELEGATION: "mAYIEA..."
/// GATEWAY_URL: ~
/// ```
///
/// 值为 null 的键视为未设置；数字和布尔值按字符串返回。
#[derive(Debug, Default, Clone)]
pub struct YamlSettings {
    values: HashMap<String, String>,
}

impl YamlSettings {
    pub fn parse(content: &str) -> Result<Self> {
        let raw: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(content)
            .map_err(|e| StorageError::Configuration(format!("Invalid settings file: {}", e)))?;

        let values = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key, value))
            })
            .collect();

        Ok(Self { values })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Configuration(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings = Self::parse(&content)?;
        tracing::debug!(
            "[Settings] Loaded {} setting(s) from {}",
            settings.values.len(),
            path.display()
        );
        Ok(settings)
    }
}

impl SettingsSource for YamlSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// 按顺序查询多个来源，第一个命中的值生效
#[derive(Default, Clone)]
pub struct ChainedSettings {
    sources: Vec<Arc<dyn SettingsSource>>,
}

impl ChainedSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, source: impl SettingsSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }
}

impl SettingsSource for ChainedSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.get_setting(key))
    }
}
