use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use crate::StorageResult;

/// Sequential, non-seekable body of a stored object. Read-time failures
/// surface as `Err` items; the stream never silently truncates.
pub type ObjectBody = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub size: Option<u64>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// An open read against a stored object: provider-reported metadata plus the
/// byte stream. The holder is sole owner of the stream and releases it by
/// dropping it, on every exit path.
pub struct ObjectStream {
    pub metadata: ObjectMetadata,
    pub body: ObjectBody,
}

/// A provider of named byte streams given a container key and object key.
///
/// Implementations must request a consistent read from the provider: the
/// object observed through the returned stream may not change mid-read.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn open_read(&self, container: &str, key: &str) -> StorageResult<ObjectStream>;
}

/// Detect content type from an object key's extension.
pub(crate) fn detect_content_type(key: &str) -> Option<String> {
    let extension = std::path::Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => Some("image/jpeg".to_string()),
        Some("png") => Some("image/png".to_string()),
        Some("gif") => Some("image/gif".to_string()),
        Some("webp") => Some("image/webp".to_string()),
        Some("avif") => Some("image/avif".to_string()),
        Some("svg") => Some("image/svg+xml".to_string()),
        Some("mp4") => Some("video/mp4".to_string()),
        Some("webm") => Some("video/webm".to_string()),
        Some("mov") => Some("video/quicktime".to_string()),
        _ => Some("application/octet-stream".to_string()),
    }
}
