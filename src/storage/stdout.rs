//! Standard output storage

use std::io::Write;

use async_trait::async_trait;

use super::{Result, Storage};
use crate::error::StorageError;

/// Prints every payload to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutStorage;

#[async_trait]
impl Storage for StdoutStorage {
    async fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        log::debug!("Printing {} to stdout", name);

        let mut out = std::io::stdout().lock();
        out.write_all(content)
            .and_then(|_| out.write_all(b"\n"))
            .and_then(|_| out.flush())
            .map_err(|e| StorageError::Write {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}
