use std::path::PathBuf;

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::stream;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::backend::{detect_content_type, ObjectMetadata, ObjectStore, ObjectStream};
use crate::{StorageError, StorageResult};

const READ_CHUNK: usize = 64 * 1024;

/// Filesystem-backed object store; objects live under
/// `base_path/<container>/<key>`.
pub struct LocalObjectStore {
    base_path: PathBuf,
}

impl LocalObjectStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Validate and sanitize container and key to prevent directory
    /// traversal.
    fn validate_path(&self, container: &str, key: &str) -> StorageResult<PathBuf> {
        if container.is_empty() || container.contains(['/', '\\']) {
            return Err(StorageError::InvalidPath(format!(
                "invalid container key: {container}"
            )));
        }

        let clean_key = key.trim_start_matches('/');
        if clean_key.is_empty() {
            return Err(StorageError::InvalidPath("empty object key".to_string()));
        }
        if clean_key.contains("..") || clean_key.contains("./") {
            return Err(StorageError::InvalidPath(format!(
                "path contains invalid sequences: {key}"
            )));
        }

        let full_path = self.base_path.join(container).join(clean_key);

        // Belt and braces on top of the sequence checks above.
        if !full_path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidPath(format!(
                "path outside base directory: {key}"
            )));
        }

        Ok(full_path)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn open_read(&self, container: &str, key: &str) -> StorageResult<ObjectStream> {
        let file_path = self.validate_path(container, key)?;

        debug!("Opening read stream for: {:?}", file_path);

        if !file_path.exists() {
            return Err(StorageError::NotFound(format!("{container}/{key}")));
        }

        let file = fs::File::open(&file_path).await?;
        let size = file.metadata().await.ok().map(|m| m.len());

        let metadata = ObjectMetadata {
            size,
            content_type: detect_content_type(key),
            etag: None, // local storage doesn't generate ETags
        };

        // The open handle pins the inode for the duration of the read, so a
        // concurrent replacement of the file cannot corrupt this stream.
        let body = stream::unfold(Some(file), |state| async move {
            let mut file = state?;
            let mut buf = BytesMut::with_capacity(READ_CHUNK);
            match file.read_buf(&mut buf).await {
                Ok(0) => None,
                Ok(_) => Some((Ok(buf.freeze()), Some(file))),
                Err(e) => Some((Err(StorageError::Io(e)), None)),
            }
        });

        Ok(ObjectStream {
            metadata,
            body: Box::pin(body),
        })
    }
}
