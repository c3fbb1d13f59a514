//! Storage sinks for collector output
//!
//! Every backend implements [`Storage`]; the collector only ever hands it a
//! file name and the serialized bytes.

use async_trait::async_trait;

use crate::config::{StorageConfig, StorageKind};
use crate::error::StorageError;

mod api;
mod fs;
mod git;
#[cfg(test)]
mod memory;
#[cfg(feature = "s3")]
mod s3;
mod stdout;

pub use api::ApiStorage;
pub use fs::FsStorage;
pub use git::GitStorage;
#[cfg(test)]
pub use memory::MemoryStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;
pub use stdout::StdoutStorage;

type Result<T> = std::result::Result<T, StorageError>;

/// Destination for serialized collector output
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `content` under `name`, replacing any previous version
    async fn write(&self, name: &str, content: &[u8]) -> Result<()>;
}

/// Build the backend selected in the configuration
pub async fn from_config(cfg: &StorageConfig) -> Result<Box<dyn Storage>> {
    log::info!("Using {} storage", cfg.kind);

    let storage: Box<dyn Storage> = match cfg.kind {
        StorageKind::Fs => Box::new(FsStorage::new(&cfg.fs.base_dir)),
        StorageKind::Stdout => Box::new(StdoutStorage),
        StorageKind::Api => Box::new(ApiStorage::new(&cfg.api)?),
        StorageKind::Git => Box::new(GitStorage::clone_from(&cfg.git).await?),
        StorageKind::S3 => s3_storage(cfg).await?,
    };

    Ok(storage)
}

#[cfg(feature = "s3")]
async fn s3_storage(cfg: &StorageConfig) -> Result<Box<dyn Storage>> {
    Ok(Box::new(S3Storage::new(&cfg.s3).await?))
}

#[cfg(not(feature = "s3"))]
async fn s3_storage(_cfg: &StorageConfig) -> Result<Box<dyn Storage>> {
    Err(StorageError::Unsupported("s3".to_string()))
}
