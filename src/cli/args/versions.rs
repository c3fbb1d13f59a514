//! Version collector flags

use clap::Args;

use crate::config::VersionConfig;

#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Versions")]
pub struct VersionArgs {
    /// Team whose workloads are scanned for versions
    #[arg(long, env = "COLLECTOR_TEAM_NAME", default_value = "5xx")]
    pub team_name: String,

    /// Value of the cluster_name metric label
    #[arg(long, env = "COLLECTOR_CLUSTER_NAME", default_value = "")]
    pub cluster_name: String,
}

impl From<VersionArgs> for VersionConfig {
    fn from(args: VersionArgs) -> Self {
        Self {
            team_name: args.team_name,
            cluster_name: args.cluster_name,
        }
    }
}
