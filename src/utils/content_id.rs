//! 从聊天文本中提取 CID
//!
//! 先把文本切成 ASCII 字母数字片段（`_`、标点、中文等都是分隔符），
//! 只有"长得像" CID 的片段才交给 `cid` crate 解析：
//! - v0：`Qm` 开头，共 46 个 base58btc 字符
//! - v1：`b` 开头（base32），后接任意长度的字母数字
//!
//! 解析失败的片段直接丢弃，不记录日志（聊天文本中大部分单词都不是 CID）。

use cid::{Cid, Version};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Message;

static ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("alphanumeric run pattern is valid"));

static CID_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Qm[1-9A-HJ-NP-Za-km-z]{44}|b[A-Za-z0-9]+)$")
        .expect("CID candidate pattern is valid")
});

/// 提取文本中所有合法 CID（规范字符串形式）
///
/// 按出现顺序返回，不去重。
pub fn extract_cids(text: Option<&str>) -> Vec<String> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Vec::new(),
    };

    ALNUM_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|run| CID_CANDIDATE.is_match(run))
        .filter_map(|run| Cid::try_from(run).ok())
        .filter(|cid| matches!(cid.version(), Version::V0 | Version::V1))
        .map(|cid| cid.to_string())
        .collect()
}

pub fn extract_cids_from_message(message: &Message) -> Vec<String> {
    extract_cids(message.text.as_deref())
}

/// 网关访问地址：`{gateway}/ipfs/{cid}`，不做任何编码
pub fn gateway_link(gateway_url: &str, cid: &str) -> String {
    format!("{}/ipfs/{}", gateway_url, cid)
}
