//! STORAGE_RETRIEVE：为消息中的 CID 生成网关下载链接

use async_trait::async_trait;

use super::{reply, reply_best_effort, Action, HandlerOptions, ResponseSink, State};
use crate::config::{validate_storage_config, SettingsSource, StorageConfig};
use crate::error::Result;
use crate::models::{ActionExample, Message, ResponseContent};
use crate::utils::{extract_cids_from_message, gateway_link};

pub const RETRIEVE_ACTION_NAME: &str = "STORAGE_RETRIEVE";

pub const NO_CIDS_MESSAGE: &str = "You didn't provide any CIDs to retrieve.";

const SIMILES: &[&str] = &[
    "RETRIEVE",
    "RETRIEVE_FILE",
    "RETRIEVE_FILE_FROM_STORAGE",
    "RETRIEVE_FILE_FROM_IPFS",
    "GET",
    "GET_FILE",
    "GET_FILE_FROM_STORAGE",
    "GET_FILE_FROM_IPFS",
    "GET_FILE_FROM_CID",
    "LOAD",
    "LOAD_FILE",
    "LOAD_FILE_FROM_STORAGE",
    "LOAD_FILE_FROM_IPFS",
    "LOAD_FILE_FROM_CID",
    "READ",
    "READ_FILE",
    "READ_FILE_FROM_STORAGE",
    "READ_FILE_FROM_IPFS",
    "READ_FILE_FROM_CID",
];

const EXAMPLES: &[&[ActionExample]] = &[
    &[
        ActionExample::user(
            "Retrieve the file with CID: QmS4ghgMgfFvqPjB4WKXHaN15ZyT4K4JY8Y4K3Y4K3Y4K3Y",
        ),
        ActionExample::agent("Ok, I'll get it for you. Just a moment...", None),
    ],
    &[
        ActionExample::user("Fetch the file QmS4ghgMgfFvqPjB4WKXHaN15ZyT4K4JY8Y4K3Y4K3Y4K3Y"),
        ActionExample::agent("Ok, I'll get it for you. Just a second...", None),
    ],
    &[
        ActionExample::user("Get the file QmS4ghgMgfFvqPjB4WKXHaN15ZyT4K4JY8Y4K3Y4K3Y4K3Y"),
        ActionExample::agent("Ok, I'll get it for you. Hold on...", None),
    ],
];

/// 待下载的文件链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub url: String,
    pub title: String,
}

/// 按 CID 顺序生成链接，标题为 `File 1`、`File 2` ...
pub fn retrieved_files(gateway_url: &str, cids: &[String]) -> Vec<RetrievedFile> {
    cids.iter()
        .enumerate()
        .map(|(idx, cid)| RetrievedFile {
            url: gateway_link(gateway_url, cid),
            title: format!("File {}", idx + 1),
        })
        .collect()
}

fn download_message(files: &[RetrievedFile]) -> String {
    let lines: Vec<String> = files.iter().map(|f| format!("- {}", f.url)).collect();
    format!(
        "The file(s) you requested are ready to be downloaded. \n\n{}",
        lines.join("\n")
    )
}

/// 检索 Action，不需要会话
#[derive(Debug, Default, Clone, Copy)]
pub struct RetrieveAction;

impl RetrieveAction {
    pub fn new() -> Self {
        Self
    }

    async fn send_links(
        &self,
        config: &StorageConfig,
        cids: &[String],
        respond: Option<&dyn ResponseSink>,
    ) -> Result<()> {
        tracing::info!("[STORAGE_RETRIEVE] Retrieving file(s) from storage...");
        let files = retrieved_files(config.gateway_url(), cids);
        tracing::debug!(files = ?files, "[STORAGE_RETRIEVE] Download links");
        reply(respond, ResponseContent::text(download_message(&files))).await
    }
}

#[async_trait]
impl Action for RetrieveAction {
    fn name(&self) -> &'static str {
        RETRIEVE_ACTION_NAME
    }

    fn similes(&self) -> &'static [&'static str] {
        SIMILES
    }

    fn description(&self) -> &'static str {
        "Retrieve a file from the Storacha network. Use this action when a user asks you to retrieve a file from the Storacha network based on a CID."
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        EXAMPLES
    }

    async fn validate(&self, runtime: &dyn SettingsSource, _message: &Message) -> Result<bool> {
        validate_storage_config(runtime)?;
        Ok(true)
    }

    async fn handler(
        &self,
        runtime: &dyn SettingsSource,
        message: &Message,
        _state: Option<&State>,
        _options: &HandlerOptions,
        respond: Option<&dyn ResponseSink>,
    ) -> Result<bool> {
        let cids = extract_cids_from_message(message);
        if cids.is_empty() {
            reply_best_effort(respond, ResponseContent::text(NO_CIDS_MESSAGE)).await;
            return Ok(false);
        }

        // 配置错误直接返回给宿主
        let config = validate_storage_config(runtime)?;

        match self.send_links(&config, &cids, respond).await {
            Ok(()) => {
                tracing::info!("[STORAGE_RETRIEVE] File(s) retrieved successfully!");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = ?e, "[STORAGE_RETRIEVE] Error during retrieve file(s) from storage");
                reply_best_effort(
                    respond,
                    ResponseContent::text(format!(
                        "Error during retrieve file(s) from storage: {}",
                        e
                    )),
                )
                .await;
                Ok(false)
            }
        }
    }
}
