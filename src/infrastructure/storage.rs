// src/infrastructure/storage.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::storage::MediaFiles,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Upload directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalMediaFiles {
    root: PathBuf,
}

impl LocalMediaFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stored names are flat; anything that could leave the directory is
    /// refused.
    fn path_for(&self, filename: &str) -> ApplicationResult<PathBuf> {
        let flat = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        if filename.is_empty() || filename.contains(['/', '\\']) || !flat {
            return Err(ApplicationError::infrastructure(format!(
                "refusing to touch media file '{filename}'"
            )));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl MediaFiles for LocalMediaFiles {
    async fn remove(&self, filename: &str) -> ApplicationResult<()> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "media file already absent");
                Ok(())
            }
            Err(err) => Err(ApplicationError::infrastructure(format!(
                "failed to remove {}: {err}",
                path.display()
            ))),
        }
    }
}
