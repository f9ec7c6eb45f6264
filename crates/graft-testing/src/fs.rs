use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use graft_host::{HostError, WorkspaceFs};
use parking_lot::Mutex;

/// [`WorkspaceFs`] over in-memory paths. Nothing touches the real disk, so
/// tests can use absolute workspace layouts without tempdirs.
#[derive(Default)]
pub struct MemoryFs {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    files: HashMap<PathBuf, String>,
    dirs: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.inner.lock().files.insert(path.into(), contents.into());
        self
    }

    /// Contents of the file at `path`, if one was written or seeded.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner.lock().files.get(path.as_ref()).cloned()
    }

    /// Every directory created so far.
    pub fn dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<_> = self.inner.lock().dirs.iter().cloned().collect();
        dirs.sort();
        dirs
    }
}

#[async_trait]
impl WorkspaceFs for MemoryFs {
    async fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.lock();
        inner.files.contains_key(path) || inner.dirs.contains(path)
    }

    async fn create_dir_all(&self, dir: &Path) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            inner.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), HostError> {
        self.inner
            .lock()
            .files
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
