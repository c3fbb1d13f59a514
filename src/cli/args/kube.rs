//! Cluster connection flags

use std::path::PathBuf;

use clap::Args;

use crate::config::KubeConfig;

/// Kubernetes connection settings
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Kubernetes")]
pub struct KubeArgs {
    /// Path to a kubeconfig file, in-cluster configuration when unset
    #[arg(long, env = "COLLECTOR_KUBE_CONFIG")]
    pub kube_config: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, env = "COLLECTOR_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    /// URL of the API server
    #[arg(long, env = "COLLECTOR_MASTER_URL")]
    pub master_url: Option<String>,
}

impl From<KubeArgs> for KubeConfig {
    fn from(args: KubeArgs) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            config_file: args.kube_config.filter(|p| !p.as_os_str().is_empty()),
            context: non_empty(args.kube_context),
            master_url: non_empty(args.master_url),
        }
    }
}
