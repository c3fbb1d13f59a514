//! Storage backend flags

use std::path::PathBuf;

use clap::Args;

use crate::config::{
    ApiConfig, FsConfig, GitConfig, S3Config, StorageConfig, StorageKind, default_git_directory,
};

/// Where the collector output goes
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Storage")]
pub struct StorageArgs {
    /// Storage backend for the output files
    #[arg(long, env = "COLLECTOR_STORAGE", value_enum, default_value_t = StorageKind::S3)]
    pub storage: StorageKind,

    /// Output file name, <environment>-output.json when unset
    #[arg(long, env = "COLLECTOR_FILE_NAME")]
    pub file_name: Option<String>,

    /// S3 bucket receiving the output
    #[arg(long, env = "COLLECTOR_S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// Custom S3 endpoint (e.g. MinIO)
    #[arg(long, env = "COLLECTOR_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    #[arg(long, env = "COLLECTOR_S3_REGION")]
    pub s3_region: Option<String>,

    /// Key prefix for every object
    #[arg(long, env = "COLLECTOR_S3_PREFIX", default_value = "")]
    pub s3_prefix: String,

    /// Directory the fs storage writes to
    #[arg(long, env = "COLLECTOR_FS_BASE_DIR", default_value = ".")]
    pub fs_base_dir: PathBuf,

    /// Repository the git storage pushes to
    #[arg(long, env = "COLLECTOR_GIT_URL")]
    pub git_url: Option<String>,

    /// Clone directory, under the user cache directory when unset
    #[arg(long, env = "COLLECTOR_GIT_DIRECTORY")]
    pub git_directory: Option<PathBuf>,

    /// SSH private key for clone and push
    #[arg(long, env = "COLLECTOR_GIT_PRIVATE_KEY_FILE")]
    pub git_private_key_file: Option<PathBuf>,

    /// HTTPS access token, preferred over the private key
    #[arg(long, alias = "git-password", env = "COLLECTOR_GIT_TOKEN", hide_env_values = true)]
    pub git_token: Option<String>,

    #[arg(long, env = "COLLECTOR_GIT_BRANCH")]
    pub git_branch: Option<String>,

    #[arg(long, env = "COLLECTOR_GIT_AUTHOR_NAME", default_value = "ClusterImageScanner")]
    pub git_author_name: String,

    #[arg(
        long,
        env = "COLLECTOR_GIT_AUTHOR_EMAIL",
        default_value = "clusterimagescanner@localhost"
    )]
    pub git_author_email: String,

    /// Endpoint the api storage PUTs to
    #[arg(long, env = "COLLECTOR_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    #[arg(long, env = "COLLECTOR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "COLLECTOR_API_SIGNATURE", hide_env_values = true)]
    pub api_signature: Option<String>,
}

impl From<StorageArgs> for StorageConfig {
    fn from(args: StorageArgs) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Self {
            kind: args.storage,
            file_name: non_empty(args.file_name),
            s3: S3Config {
                bucket: args.s3_bucket.unwrap_or_default(),
                endpoint: non_empty(args.s3_endpoint),
                region: non_empty(args.s3_region),
                prefix: args.s3_prefix,
            },
            fs: FsConfig {
                base_dir: args.fs_base_dir,
            },
            git: GitConfig {
                url: args.git_url.unwrap_or_default(),
                directory: args.git_directory.unwrap_or_else(default_git_directory),
                private_key_file: args.git_private_key_file,
                token: non_empty(args.git_token),
                branch: non_empty(args.git_branch),
                author_name: args.git_author_name,
                author_email: args.git_author_email,
            },
            api: ApiConfig {
                endpoint: args.api_endpoint.unwrap_or_default(),
                key: args.api_key.unwrap_or_default(),
                signature: args.api_signature.unwrap_or_default(),
            },
        }
    }
}
