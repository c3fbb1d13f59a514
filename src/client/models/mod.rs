//! Cluster snapshot models
//!
//! Plain copies of the Kubernetes objects the collectors read. The cluster
//! client converts `k8s-openapi` types into these so the merge and extraction
//! logic never touches the API types directly.

mod metadata;
mod namespace;
mod pod;
mod workload;

pub use metadata::{Annotated, Metadata};
pub use namespace::NamespaceRecord;
pub use pod::{ContainerSpecInfo, ContainerStatusInfo, PodRecord, SecurityContextInfo};
pub use workload::{WorkloadKind, WorkloadRecord};
