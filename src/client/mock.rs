//! Mock cluster client for testing
//!
//! Serves fixed namespaces, pods and workloads from memory without a cluster.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::ClusterApi;
use super::models::{NamespaceRecord, PodRecord, WorkloadRecord};
use crate::error::{ClusterError, Result};

/// Mock cluster client for testing.
///
/// Configure the snapshot via builder methods, then hand it to a collector.
///
/// # Example
/// ```ignore
/// let mock = MockClusterClient::new()
///     .with_namespace(NamespaceRecord::new("team-x"))
///     .with_pod("team-x", pod);
/// ```
#[derive(Default)]
pub struct MockClusterClient {
    /// Namespaces returned from list_namespaces
    namespaces: Vec<NamespaceRecord>,
    /// Pods per namespace returned from list_pods
    pods: HashMap<String, Vec<PodRecord>>,
    /// Workloads returned from list_workloads
    workloads: Vec<WorkloadRecord>,
    /// Error to return from the next call, consumed on first use
    error: Arc<Mutex<Option<ClusterError>>>,
    /// Label selectors passed to list_workloads
    selectors: Arc<Mutex<Vec<String>>>,
}

impl MockClusterClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a namespace
    pub fn with_namespace(mut self, namespace: NamespaceRecord) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Builder: add a pod to a namespace
    pub fn with_pod(mut self, namespace: &str, pod: PodRecord) -> Self {
        self.pods.entry(namespace.to_string()).or_default().push(pod);
        self
    }

    /// Builder: add a workload
    pub fn with_workload(mut self, workload: WorkloadRecord) -> Self {
        self.workloads.push(workload);
        self
    }

    /// Builder: fail the next call
    pub fn with_error(self, error: ClusterError) -> Self {
        *self.error.try_lock().expect("mock not shared yet") = Some(error);
        self
    }

    /// Label selectors received so far
    pub async fn selectors(&self) -> Vec<String> {
        self.selectors.lock().await.clone()
    }

    async fn take_error(&self) -> Result<()> {
        match self.error.lock().await.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClusterApi for MockClusterClient {
    async fn list_namespaces(&self) -> Result<Vec<NamespaceRecord>> {
        self.take_error().await?;
        Ok(self.namespaces.clone())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodRecord>> {
        self.take_error().await?;
        Ok(self.pods.get(namespace).cloned().unwrap_or_default())
    }

    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<WorkloadRecord>> {
        self.take_error().await?;
        self.selectors.lock().await.push(label_selector.to_string());
        Ok(self.workloads.clone())
    }
}
