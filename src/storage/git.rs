//! Git repository storage
//!
//! The repository is cloned once when the backend is built. Every write
//! replaces one file in the working tree, commits it and pushes.
//! Authentication uses an HTTPS access token when one is configured and an
//! SSH private key otherwise. All operations shell out to the system `git`.

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;

use super::{Result, Storage};
use crate::config::GitConfig;
use crate::error::StorageError;

/// Commits collector output into a git repository
#[derive(Debug, Clone)]
pub struct GitStorage {
    directory: PathBuf,
    ssh_command: Option<String>,
    author_name: String,
    author_email: String,
}

impl GitStorage {
    /// Clone the configured repository into a fresh directory
    pub async fn clone_from(cfg: &GitConfig) -> Result<Self> {
        if cfg.url.is_empty() {
            return Err(StorageError::NotConfigured("git-url is not set".to_string()));
        }

        let ssh_command = match (&cfg.token, &cfg.private_key_file) {
            (Some(_), _) => None,
            (None, Some(key)) => {
                if !key.is_file() {
                    return Err(StorageError::NotConfigured(format!(
                        "git private key file {} doesn't exist",
                        key.display()
                    )));
                }
                Some(ssh_command(key))
            }
            (None, None) => None,
        };

        if cfg.directory.exists() {
            log::debug!("Removing previous clone at {}", cfg.directory.display());
            tokio::fs::remove_dir_all(&cfg.directory)
                .await
                .map_err(|e| StorageError::Write {
                    name: cfg.directory.display().to_string(),
                    reason: e.to_string(),
                })?;
        }

        let storage = Self {
            directory: cfg.directory.clone(),
            ssh_command,
            author_name: cfg.author_name.clone(),
            author_email: cfg.author_email.clone(),
        };

        let url = match &cfg.token {
            Some(token) => authenticated_url(&cfg.url, token),
            None => cfg.url.clone(),
        };
        let directory = cfg.directory.display().to_string();

        let mut args = vec!["clone", "--depth", "1"];
        if let Some(branch) = &cfg.branch {
            args.extend(["--branch", branch.as_str()]);
        }
        args.extend([url.as_str(), directory.as_str()]);

        log::info!("Cloning {} into {}", cfg.url, directory);
        storage.run("clone", &args, None).await?;

        Ok(storage)
    }

    async fn run(&self, label: &str, args: &[&str], cwd: Option<&Path>) -> Result<Output> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        if let Some(ssh) = &self.ssh_command {
            cmd.env("GIT_SSH_COMMAND", ssh);
        }

        let output = cmd.output().await.map_err(|e| StorageError::Git {
            command: label.to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(StorageError::Git {
                command: label.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }

    async fn has_staged_changes(&self) -> Result<bool> {
        let status = self
            .run("status", &["status", "--porcelain"], Some(&self.directory))
            .await?;
        Ok(!status.stdout.is_empty())
    }
}

#[async_trait]
impl Storage for GitStorage {
    async fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.directory.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| StorageError::Write {
                name: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let dir = Some(self.directory.as_path());
        self.run("add", &["add", name], dir).await?;

        if !self.has_staged_changes().await? {
            log::info!("{} is unchanged, nothing to commit", name);
            return Ok(());
        }

        let user_name = format!("user.name={}", self.author_name);
        let user_email = format!("user.email={}", self.author_email);
        let message = format!(
            "Update {} at {}",
            name,
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        );
        self.run(
            "commit",
            &["-c", &user_name, "-c", &user_email, "commit", "-m", &message],
            dir,
        )
        .await?;

        self.run("push", &["push"], dir).await?;
        log::info!("Pushed {} to git", name);
        Ok(())
    }
}

/// Embed an access token into an HTTPS clone URL
fn authenticated_url(url: &str, token: &str) -> String {
    let host_and_path = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    format!("https://x-access-token:{}@{}", token, host_and_path)
}

fn ssh_command(key: &Path) -> String {
    format!(
        "ssh -i {} -o IdentitiesOnly=yes -o StrictHostKeyChecking=accept-new",
        key.display()
    )
}
