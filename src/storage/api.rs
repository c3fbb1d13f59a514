//! Push API storage
//!
//! Each payload is sent as an HTTP `PUT` to a fixed endpoint, authenticated by
//! an API key and signature header.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};

use super::{Result, Storage};
use crate::config::ApiConfig;
use crate::error::StorageError;

const API_KEY_HEADER: &str = "x-api-key";
const API_SIGNATURE_HEADER: &str = "x-api-signature";

/// Uploads payloads to a push API
#[derive(Debug, Clone)]
pub struct ApiStorage {
    http: HttpClient,
    endpoint: String,
    key: String,
    signature: String,
}

impl ApiStorage {
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        if cfg.endpoint.is_empty() {
            return Err(StorageError::NotConfigured("api-endpoint is not set".to_string()));
        }

        let http = HttpClient::builder()
            .user_agent(concat!("image-metadata-collector/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            key: cfg.key.clone(),
            signature: cfg.signature.clone(),
        })
    }
}

#[async_trait]
impl Storage for ApiStorage {
    async fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        log::debug!("PUT {} ({} bytes) to {}", name, content.len(), self.endpoint);

        let response = self
            .http
            .put(&self.endpoint)
            .header(API_KEY_HEADER, &self.key)
            .header(API_SIGNATURE_HEADER, &self.signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(content.to_vec())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("API request for {} failed with status {}", name, status);
            return Err(StorageError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        log::info!("Uploaded {} to API", name);
        Ok(())
    }
}
