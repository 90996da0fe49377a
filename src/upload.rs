//! Upload staging module
//!
//! Uploaded audio is written to a staging directory under a random name
//! and wrapped in an [`UploadedFile`] guard. The guard removes the file
//! when the request is done with it, on every exit path.

use std::path::{Path, PathBuf};

use tokio::fs::File;

use crate::logger;

/// Staging directory for uploaded files
#[derive(Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the staging directory, creating it if it does not exist
    pub fn open(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a new, uniquely named staging file
    ///
    /// The guard is created before the file, so a failed `create` leaves
    /// nothing behind and every later failure deletes what was written.
    pub async fn create(&self) -> std::io::Result<(UploadedFile, File)> {
        let path = self.dir.join(uuid::Uuid::new_v4().simple().to_string());
        let guard = UploadedFile {
            path: Some(path),
            size: 0,
        };
        let file = File::create(guard.path()).await?;
        Ok((guard, file))
    }
}

/// A staged upload that lives no longer than the request that received it
#[derive(Debug)]
pub struct UploadedFile {
    /// `None` once the file has been discarded
    path: Option<PathBuf>,
    size: u64,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    pub const fn size(&self) -> u64 {
        self.size
    }

    pub fn record_written(&mut self, bytes: usize) {
        self.size += bytes as u64;
    }

    /// Delete the file now, reporting failure to the caller
    pub async fn discard(mut self) -> std::io::Result<()> {
        match self.path.take() {
            Some(path) => tokio::fs::remove_file(&path).await,
            None => Ok(()),
        }
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {
                logger::log_debug(&format!("[UPLOAD] Removed {} on early exit", path.display()));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                logger::log_warning(&format!(
                    "[UPLOAD] Failed to remove {}: {e}",
                    path.display()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_open_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("uploads");
        let store = UploadStore::open(&dir).unwrap();
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn test_discard_removes_file() {
        let root = tempfile::tempdir().unwrap();
        let store = UploadStore::open(root.path()).unwrap();

        let (mut upload, mut file) = store.create().await.unwrap();
        file.write_all(b"RIFF0000WAVE").await.unwrap();
        file.flush().await.unwrap();
        upload.record_written(12);
        drop(file);

        assert!(upload.path().exists());
        assert_eq!(upload.size(), 12);

        upload.discard().await.unwrap();
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let root = tempfile::tempdir().unwrap();
        let store = UploadStore::open(root.path()).unwrap();

        {
            let (_upload, mut file) = store.create().await.unwrap();
            file.write_all(b"partial").await.unwrap();
            assert_eq!(entries(root.path()), 1);
        }

        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_names_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let store = UploadStore::open(root.path()).unwrap();

        let (a, _fa) = store.create().await.unwrap();
        let (b, _fb) = store.create().await.unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(entries(root.path()), 2);
    }

    #[tokio::test]
    async fn test_discard_reports_missing_file() {
        let root = tempfile::tempdir().unwrap();
        let store = UploadStore::open(root.path()).unwrap();

        let (upload, file) = store.create().await.unwrap();
        drop(file);
        std::fs::remove_file(upload.path()).unwrap();
        assert!(upload.discard().await.is_err());
    }
}
