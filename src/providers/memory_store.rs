//! Agent 数据内存存储
//!
//! 每个客户端会话一个全新实例，SDK 用它保存 Agent 元数据、空间和委托。
//! 进程退出即丢失，不落盘。

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存数据，覆盖同名键
    pub fn save(&self, key: &str, value: serde_json::Value) {
        self.entries.write().insert(key.to_string(), value);
        tracing::debug!("[MemoryStore] Saved entry: {}", key);
    }

    pub fn load(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.read().get(key).cloned()
    }

    /// 清空所有数据
    pub fn reset(&self) {
        self.entries.write().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
