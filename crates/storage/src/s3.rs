use async_trait::async_trait;
use aws_sdk_s3::Client;
use futures_util::stream;
use tracing::{debug, error};

use crate::backend::{ObjectMetadata, ObjectStore, ObjectStream};
use crate::{StorageError, StorageResult};

/// S3-backed object store. The request's container key names the bucket.
pub struct S3ObjectStore {
    client: Client,
    region: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, region: String) -> Self {
        debug!("Initializing S3 object store in region '{}'", region);

        Self { client, region }
    }

    /// Validate and sanitize the S3 object key.
    fn validate_key(&self, key: &str) -> StorageResult<String> {
        // S3 object keys should not start with a slash.
        let clean_key = key.trim_start_matches('/');

        if clean_key.is_empty() {
            return Err(StorageError::InvalidPath("empty object key".to_string()));
        }

        if clean_key.contains("..") {
            return Err(StorageError::InvalidPath(format!(
                "key contains invalid sequences: {key}"
            )));
        }

        Ok(clean_key.to_string())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn open_read(&self, container: &str, key: &str) -> StorageResult<ObjectStream> {
        let key = self.validate_key(key)?;

        debug!(
            "Opening read stream from S3: bucket={}, region={}, key={}",
            container, self.region, key
        );

        // HEAD first to capture the current ETag; the GET below pins it with
        // If-Match so the object cannot change under the read.
        let head = self
            .client
            .head_object()
            .bucket(container)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NotFound") {
                    StorageError::NotFound(format!("{container}/{key}"))
                } else {
                    error!("Failed to stat S3 object: {}", e);
                    StorageError::Unavailable(format!("S3 head_object failed: {e}"))
                }
            })?;

        let mut get_request = self.client.get_object().bucket(container).key(&key);
        if let Some(etag) = head.e_tag() {
            get_request = get_request.if_match(etag);
        }

        let result = get_request.send().await.map_err(|e| {
            let text = e.to_string();
            if text.contains("NoSuchKey") || text.contains("NoSuchBucket") {
                StorageError::NotFound(format!("{container}/{key}"))
            } else if text.contains("PreconditionFailed") {
                StorageError::Unavailable(format!(
                    "object {container}/{key} changed while opening the read"
                ))
            } else {
                error!("Failed to open S3 object: {}", e);
                StorageError::Unavailable(format!("S3 get_object failed: {e}"))
            }
        })?;

        let metadata = ObjectMetadata {
            size: result.content_length().map(|len| len as u64),
            content_type: result.content_type().map(|ct| ct.to_string()),
            etag: result.e_tag().map(|tag| tag.to_string()),
        };

        let body = stream::unfold(Some(result.body), |state| async move {
            let mut body = state?;
            match body.try_next().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(body))),
                Ok(None) => None,
                Err(e) => Some((
                    Err(StorageError::Unavailable(format!(
                        "S3 body read failed: {e}"
                    ))),
                    None,
                )),
            }
        });

        Ok(ObjectStream {
            metadata,
            body: Box::pin(body),
        })
    }
}
