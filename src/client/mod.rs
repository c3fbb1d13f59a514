//! Kubernetes cluster client
//!
//! The collectors only see the [`ClusterApi`] trait, which returns complete
//! in-memory snapshots of namespaces, pods and workloads.

use async_trait::async_trait;

use crate::error::Result;

pub mod kubernetes;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use kubernetes::KubeClient;
#[cfg(test)]
pub use mock::MockClusterClient;
use models::{NamespaceRecord, PodRecord, WorkloadRecord};

/// Read access to the cluster
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List all namespaces
    async fn list_namespaces(&self) -> Result<Vec<NamespaceRecord>>;

    /// List all pods of one namespace
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodRecord>>;

    /// List Deployments, then StatefulSets, then DaemonSets in all namespaces
    /// matching `label_selector`
    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<WorkloadRecord>>;
}
