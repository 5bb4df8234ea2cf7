use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::data::image_store::ImageStore;
use crate::domain::error::DomainError;

/// Изображения, лежащие файлами в каталоге на диске.
#[derive(Debug, Clone)]
pub(crate) struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        let key = key.trim_start_matches('/');
        if key.is_empty() || key.split('/').any(|segment| segment == "..") {
            return Err(DomainError::Validation {
                field: "uploaded_image_key",
                message: "must be a relative storage key",
            });
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(key, "post image removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(key, "post image already absent");
                Ok(())
            }
            Err(err) => Err(DomainError::Unexpected(format!(
                "failed to remove image {}: {err}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::LocalImageStore;
    use crate::data::image_store::ImageStore;

    fn scratch_dir() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock must be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("feed-server-images-{nanos}"))
    }

    #[tokio::test]
    async fn delete_removes_existing_file() {
        let root = scratch_dir();
        tokio::fs::create_dir_all(&root).await.expect("create dir");
        let file = root.join("cat.png");
        tokio::fs::write(&file, b"png").await.expect("write file");

        let store = LocalImageStore::new(&root);
        store.delete("cat.png").await.expect("delete must succeed");

        assert!(!file.exists());
        tokio::fs::remove_dir_all(&root).await.expect("cleanup");
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_ok() {
        let store = LocalImageStore::new(scratch_dir());
        store.delete("missing.png").await.expect("missing file is not an error");
    }

    #[tokio::test]
    async fn delete_rejects_parent_traversal() {
        let store = LocalImageStore::new(scratch_dir());
        assert!(store.delete("../secret").await.is_err());
    }
}
