//! 工具函数

pub mod content_id;

pub use content_id::{extract_cids, extract_cids_from_message, gateway_link};
