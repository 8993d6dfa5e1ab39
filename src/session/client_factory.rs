//! 存储客户端工厂
//!
//! 根据已校验的配置创建认证会话：
//! 解析私钥 → 新建内存存储 → 创建客户端 → 导入委托 → 注册空间 → 设为当前空间。
//! 每一步的 SDK 错误都原样返回，不重试。

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::models::DelegationProof;
use crate::providers::{MemoryStore, UploadClient, UploadService};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// 解码 base64 编码的委托 CAR
///
/// 忽略空白字符（从终端复制时常带换行），补齐与否均可；
/// 标准字母表失败时再尝试 URL-safe 字母表。
pub fn decode_delegation(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD_LENIENT.decode(&compact).or_else(|err| {
        URL_SAFE_LENIENT
            .decode(&compact)
            .map_err(|_| StorageError::InvalidDelegation(err))
    })
}

/// 解码委托并交给 SDK 导入为证明 DAG
pub async fn parse_delegation(
    service: &dyn UploadService,
    data: &str,
) -> Result<DelegationProof> {
    let car = decode_delegation(data)?;
    service
        .import_delegation(&car)
        .await
        .map_err(StorageError::Upstream)
}

/// 创建已绑定空间的存储客户端
pub async fn create_storage_client(
    service: &dyn UploadService,
    config: &StorageConfig,
) -> Result<Arc<dyn UploadClient>> {
    if config.signing_key.is_empty() {
        return Err(StorageError::MissingCredential);
    }
    if config.delegation.is_empty() {
        return Err(StorageError::MissingDelegation);
    }

    let principal = service
        .parse_signer(&config.signing_key)
        .map_err(StorageError::Upstream)?;
    let store = MemoryStore::new();
    let client = service
        .create_client(principal, store)
        .await
        .map_err(StorageError::Upstream)?;

    let proof = parse_delegation(service, &config.delegation).await?;
    let space = client
        .add_space(proof)
        .await
        .map_err(StorageError::Upstream)?;
    client
        .set_current_space(&space)
        .await
        .map_err(StorageError::Upstream)?;

    tracing::info!(
        agent = %client.agent_did(),
        space = %space,
        "[StorageClient] Storage client initialized"
    );
    Ok(client)
}
