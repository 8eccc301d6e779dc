//! File access for the `/files/` routes.
//!
//! Every name is resolved against a single serving directory. Names that
//! could leave it (`..`, absolute paths, drive prefixes) or that name the
//! directory itself are rejected before touching the file system.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found")]
    NotFound,
    #[error("invalid file name: {0:?}")]
    InvalidPath(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads and writes files below a fixed base directory.
///
/// No locking is done: concurrent writes to one name race and the last
/// writer wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `name` onto the root, accepting only plain path segments.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(name);
        let mut segments = 0;

        for component in relative.components() {
            match component {
                Component::Normal(_) => segments += 1,
                Component::CurDir => {}
                _ => return Err(StoreError::InvalidPath(name.to_string())),
            }
        }

        if segments == 0 {
            return Err(StoreError::InvalidPath(name.to_string()));
        }

        Ok(self.root.join(relative))
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(name)?;

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound,
            _ => StoreError::Io(e),
        })
    }

    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, contents).await?;
        Ok(())
    }
}
