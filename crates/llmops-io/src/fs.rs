use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::collaborators::{BlobStore, StorageResult};
use crate::error::StorageError;

/// Filesystem-backed object store.
///
/// Layout: `<root>/<bucket>/<key>`, where `key` may contain `/` separators.
/// Keys that would escape the bucket directory are refused as `AccessDenied`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if bucket.is_empty() || key.is_empty() || escapes {
            None
        } else {
            Some(self.root.join(relative))
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self
            .object_path(bucket, key)
            .ok_or_else(|| StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, FsBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn reads_nested_key() {
        let (dir, store) = make_store();
        let path = dir.path().join("inference").join("runs/base.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"[\"a\"]").unwrap();

        let got = store.get("inference", "runs/base.json").await.unwrap();
        assert_eq!(got, b"[\"a\"]");
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let (_dir, store) = make_store();
        match store.get("inference", "nope.json").await {
            Err(StorageError::NotFound { bucket, key }) => {
                assert_eq!(bucket, "inference");
                assert_eq!(key, "nope.json");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn traversal_is_denied() {
        let (_dir, store) = make_store();
        let err = store.get("inference", "../secret").await.unwrap_err();
        assert!(matches!(err, StorageError::AccessDenied { .. }));

        let err = store.get("inference", "/etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::AccessDenied { .. }));
    }
}
