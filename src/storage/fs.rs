//! Local filesystem storage

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Result, Storage};
use crate::error::StorageError;

/// Writes files below a base directory
#[derive(Debug, Clone)]
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.base_dir.join(name);
        let write_error = |e: std::io::Error| StorageError::Write {
            name: path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(&path, content).await.map_err(write_error)?;

        log::info!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(&dir.path().join("nested").join("out"));

        storage.write("prod-output.json", b"[1]").await.unwrap();

        let path = dir.path().join("nested/out/prod-output.json");
        assert_eq!(std::fs::read(path).unwrap(), b"[1]");
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.write("a.json", b"old").await.unwrap();
        storage.write("a.json", b"new").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.json")).unwrap(), b"new");
    }
}
