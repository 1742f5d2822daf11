//! Filesystem state store
//!
//! Stores each key as `<dir>/<key>.json`. Writes go to a temporary file in
//! the same directory which is then renamed over the target, so readers
//! see either the previous or the new content, never a partial write.
//! Every write gets its own temporary file, so concurrent saves of one key
//! never share one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::StateStoreProvider;

use crate::constants::{STATE_FILE_EXTENSION, STATE_TEMP_SUFFIX};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `<dir>/<key>.json.<pid>-<n>.tmp`, unique within this process and across
/// processes sharing the directory
fn temp_path_for(path: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!(
        "{STATE_FILE_EXTENSION}.{}-{n}.{STATE_TEMP_SUFFIX}",
        std::process::id()
    ))
}

/// Directory-backed state store
#[derive(Debug, Clone)]
pub struct FilesystemStateStore {
    base_dir: PathBuf,
}

impl FilesystemStateStore {
    /// Create a store rooted at `base_dir`
    ///
    /// The directory is created on the first write.
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory holding the state files
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::io(format!("invalid state key '{key}'")));
        }
        Ok(self
            .base_dir
            .join(format!("{key}.{STATE_FILE_EXTENSION}")))
    }
}

#[async_trait]
impl StateStoreProvider for FilesystemStateStore {
    async fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| {
                Error::io_with_source(
                    format!("failed to create state directory {}", self.base_dir.display()),
                    e,
                )
            })?;

        let temp = temp_path_for(&path);
        let written = match tokio::fs::write(&temp, data).await {
            Ok(()) => tokio::fs::rename(&temp, &path).await.map_err(|e| {
                Error::io_with_source(format!("failed to replace {}", path.display()), e)
            }),
            Err(e) => Err(Error::io_with_source(
                format!("failed to write {}", temp.display()),
                e,
            )),
        };
        if written.is_err() {
            let _ = tokio::fs::remove_file(&temp).await;
        }
        written?;

        debug!(key, bytes = data.len(), "State saved");
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_with_source(
                format!("failed to read {}", path.display()),
                e,
            )),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_with_source(
                format!("failed to delete {}", path.display()),
                e,
            )),
        }
    }
}
