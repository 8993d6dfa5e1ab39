//! STORAGE_UPLOAD：将消息附件以目录形式上传到 Storacha

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::try_join_all;
use std::sync::Arc;

use super::{reply, reply_best_effort, Action, HandlerOptions, ResponseSink, State};
use crate::config::{validate_storage_config, SettingsSource};
use crate::error::{Result, StorageError};
use crate::models::{
    ActionExample, Attachment, FileBlob, Message, ResponseContent, UploadOptions, UploadProgress,
};
use crate::session::StorageClient;
use crate::utils::gateway_link;

pub const UPLOAD_ACTION_NAME: &str = "STORAGE_UPLOAD";

pub const NO_FILES_MESSAGE: &str =
    "Looks like you didn't attach any files. Please attach a file and try again.";
pub const UPLOAD_STARTED_MESSAGE: &str =
    "Sure thing! Starting the engines, hold on tight. Uploading file(s) to Storacha...";
pub const UPLOAD_FAILED_MESSAGE: &str =
    "I'm sorry, I couldn't upload the file(s) to Storacha. Please try again later.";

const UPLOAD_RETRIES: u32 = 3;
const UPLOAD_CONCURRENT_REQUESTS: usize = 3;

const SIMILES: &[&str] = &["UPLOAD", "STORE", "SAVE", "PUT", "PIN"];

const EXAMPLES: &[&[ActionExample]] = &[
    &[
        ActionExample::user("can you upload this file?"),
        ActionExample::agent(
            "I'll help you upload this file to a decentralized storage network.",
            Some(UPLOAD_ACTION_NAME),
        ),
        ActionExample::agent(
            "The files have been uploaded. You can access them at the following link: https://w3s.link/ipfs/QmHash1",
            None,
        ),
    ],
    &[
        ActionExample::user("store this document in Storacha please"),
        ActionExample::agent(
            "I'll help you store that document in Storacha storage.",
            Some(UPLOAD_ACTION_NAME),
        ),
        ActionExample::agent(
            "The files have been uploaded. You can access them at the following link: https://w3s.link/ipfs/QmHash1",
            None,
        ),
    ],
    &[
        ActionExample::user("save this image for me"),
        ActionExample::agent(
            "I'll help you save that image to Storacha storage.",
            Some(UPLOAD_ACTION_NAME),
        ),
        ActionExample::agent(
            "The image has been uploaded. You can access it at the following link: https://w3s.link/ipfs/QmHash1",
            None,
        ),
    ],
    &[
        ActionExample::user("pin this image into IPFS"),
        ActionExample::agent(
            "I'll help you pin that image into IPFS using Storacha.",
            Some(UPLOAD_ACTION_NAME),
        ),
        ActionExample::agent(
            "The files have been pinned. You can access them at the following link: https://w3s.link/ipfs/QmHash1",
            None,
        ),
    ],
    &[
        ActionExample::user("pin this file into IPFS"),
        ActionExample::agent(
            "I'll help you pin that file into IPFS using Storacha.",
            Some(UPLOAD_ACTION_NAME),
        ),
        ActionExample::agent(
            "The files have been pinned. You can access them at the following link: https://w3s.link/ipfs/QmHash1",
            None,
        ),
    ],
];

/// 上传 Action，通过生命周期管理器获取会话
pub struct UploadAction {
    client: Arc<StorageClient>,
}

impl UploadAction {
    pub fn new(client: Arc<StorageClient>) -> Self {
        Self { client }
    }

    async fn upload(
        &self,
        attachments: &[Attachment],
        respond: Option<&dyn ResponseSink>,
    ) -> Result<String> {
        reply(respond, ResponseContent::text(UPLOAD_STARTED_MESSAGE)).await?;

        tracing::info!("[STORAGE_UPLOAD] Uploading file(s) to Storacha...");
        let session = self.client.ensure_started().await?;
        // 链接使用会话所属配置中的网关
        let config = self.client.config().await?;

        let files = try_join_all(attachments.iter().map(read_attachment)).await?;
        let options = UploadOptions {
            retries: UPLOAD_RETRIES,
            concurrent_requests: UPLOAD_CONCURRENT_REQUESTS,
            piece_hasher: None,
            on_upload_progress: Some(Arc::new(|progress: UploadProgress| {
                tracing::info!(
                    "[STORAGE_UPLOAD] Uploading file(s) to Storacha... {}%",
                    progress.percent()
                );
            })),
        };
        let root = session
            .upload_directory(files, options)
            .await
            .map_err(StorageError::Upstream)?;

        let link = gateway_link(config.gateway_url(), &root.to_string());
        tracing::info!("[STORAGE_UPLOAD] Uploaded file(s) to Storacha. Link: {}", link);

        reply(
            respond,
            ResponseContent::text(format!(
                "Here you go! You can access the file(s) at the following link: {}",
                link
            )),
        )
        .await?;
        Ok(link)
    }
}

async fn read_attachment(attachment: &Attachment) -> Result<FileBlob> {
    let data = tokio::fs::read(&attachment.url).await?;
    Ok(FileBlob {
        name: attachment.title.clone(),
        content_type: attachment.content_type.clone(),
        data: Bytes::from(data),
    })
}

#[async_trait]
impl Action for UploadAction {
    fn name(&self) -> &'static str {
        UPLOAD_ACTION_NAME
    }

    fn similes(&self) -> &'static [&'static str] {
        SIMILES
    }

    fn description(&self) -> &'static str {
        "Use this action when the user wants to upload a file to Storacha distributed storage network."
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
        _runtime: &dyn SettingsSource,
        message: &Message,
        _state: Option<&State>,
        _options: &HandlerOptions,
        respond: Option<&dyn ResponseSink>,
    ) -> Result<bool> {
        let attachments = message.attachments();
        if attachments.is_empty() {
            tracing::error!("[STORAGE_UPLOAD] No file to upload.");
            reply_best_effort(respond, ResponseContent::text(NO_FILES_MESSAGE)).await;
            return Ok(false);
        }

        match self.upload(attachments, respond).await {
            Ok(_) => {
                tracing::info!("[STORAGE_UPLOAD] File(s) uploaded to Storacha");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = ?e, "[STORAGE_UPLOAD] Error uploading file(s) to Storacha");
                reply_best_effort(
                    respond,
                    ResponseContent::text(UPLOAD_FAILED_MESSAGE)
                        .with_content(serde_json::json!({ "error": e.to_string() })),
                )
                .await;
                Ok(false)
            }
        }
    }
}
