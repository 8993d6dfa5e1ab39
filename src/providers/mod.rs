//! 上传服务 Provider
//!
//! 签名、委托校验、CAR 编解码和网络传输由外部 SDK 实现，
//! 这里只定义插件依赖的接口以及交给 SDK 的内存存储。

pub mod memory_store;
pub mod upload_service;

pub use memory_store::MemoryStore;
pub use upload_service::{UploadClient, UploadService};
