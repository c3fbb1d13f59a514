//! S3 object storage

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;

use super::{Result, Storage};
use crate::config::S3Config;
use crate::error::StorageError;

/// Uploads payloads as objects to an S3 bucket
#[derive(Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl std::fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Storage")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl S3Storage {
    pub async fn new(cfg: &S3Config) -> Result<Self> {
        if cfg.bucket.is_empty() {
            return Err(StorageError::NotConfigured("s3-bucket is not set".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: cfg.bucket.clone(),
            prefix: cfg.prefix.clone(),
        })
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        let key = self.key(name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .body(ByteStream::from(content.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::Write {
                name: format!("s3://{}/{}", self.bucket, key),
                reason: e.to_string(),
            })?;

        log::info!("Created s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
