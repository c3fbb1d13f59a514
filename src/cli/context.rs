//! Command execution context
//!
//! Builds the validated configuration and the cluster client once, so the
//! handlers only deal with running collectors.

use std::sync::Arc;

use crate::client::{ClusterApi, KubeClient};
use crate::config::Config;
use crate::error::Result;

/// Configuration and cluster client shared by the collector commands
pub struct CommandContext {
    /// Validated configuration with list files loaded
    pub config: Config,
    /// Cluster client, shared between the concurrently running collectors
    pub client: Arc<dyn ClusterApi>,
}

impl CommandContext {
    /// Connect to the cluster described by `config`.
    ///
    /// # Errors
    /// Returns an error when no cluster configuration can be found or the
    /// kubeconfig is unusable.
    pub async fn new(config: Config) -> Result<Self> {
        let client = KubeClient::connect(&config.kube).await?;
        Ok(Self::from_parts(config, Arc::new(client)))
    }

    pub fn from_parts(config: Config, client: Arc<dyn ClusterApi>) -> Self {
        Self { config, client }
    }
}
