use std::path::Path;

use async_trait::async_trait;

use crate::HostError;

/// Workspace file writes, the only direct file-system surface of the
/// pipeline.
///
/// Kept separate from [`DocumentStore`](crate::DocumentStore): creating a
/// file on disk and opening it in the editor are different host concerns.
#[async_trait]
pub trait WorkspaceFs: Send + Sync {
    /// Returns whether a path exists.
    async fn exists(&self, path: &Path) -> bool;

    /// Creates `dir` and any missing parents.
    async fn create_dir_all(&self, dir: &Path) -> Result<(), HostError>;

    /// Writes `contents` to `path`, replacing any existing file.
    async fn write(&self, path: &Path, contents: &str) -> Result<(), HostError>;
}

/// Local OS file system implementation.
#[derive(Debug, Clone, Default)]
pub struct LocalWorkspaceFs;

impl LocalWorkspaceFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceFs for LocalWorkspaceFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir_all(&self, dir: &Path) -> Result<(), HostError> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(())
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), HostError> {
        tokio::fs::write(path, contents).await?;
        Ok(())
    }
}
