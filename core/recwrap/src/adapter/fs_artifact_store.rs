//! ファイルシステム上のアーティファクトストア実装
//!
//! アーカイブルート（例: ${JENKINS_HOME}/jobs/${JOB_NAME}/builds/${BUILD_NUMBER}/archive）
//! へのコピーでアーカイブを表現する。

use crate::ports::outbound::ArtifactStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// アーカイブディレクトリへコピーする ArtifactStore 実装
pub struct FsArtifactStore {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl AsRef<Path>) -> Self {
        Self {
            fs,
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn archive(
        &self,
        workspace_root: &Path,
        logical_name: &str,
        rel_path: &str,
    ) -> Result<(), Error> {
        self.fs.create_dir_all(&self.root)?;
        let src = workspace_root.join(rel_path);
        let dst = self.root.join(logical_name);
        self.fs.copy(&src, &dst)?;
        Ok(())
    }

    fn archived_len(&self, logical_name: &str) -> Result<u64, Error> {
        Ok(self.fs.metadata(&self.root.join(logical_name))?.len())
    }

    fn root_dir(&self) -> PathBuf {
        self.root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;

    #[test]
    fn test_archive_copies_and_reports_len() {
        let dir = tempfile::tempdir().unwrap();
        let ws = dir.path().join("ws");
        let archive = dir.path().join("archive");
        std::fs::create_dir_all(&ws).unwrap();
        std::fs::write(ws.join("web_7.mp4"), vec![0u8; 1000]).unwrap();

        let store = FsArtifactStore::new(Arc::new(StdFileSystem), &archive);
        store.archive(&ws, "web_7.mp4", "web_7.mp4").unwrap();

        assert_eq!(store.archived_len("web_7.mp4").unwrap(), 1000);
        assert!(archive.join("web_7.mp4").exists());
        assert_eq!(store.root_dir(), archive);
    }

    #[test]
    fn test_archived_len_missing_is_err() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(Arc::new(StdFileSystem), dir.path());
        assert!(store.archived_len("missing.mp4").is_err());
    }
}
