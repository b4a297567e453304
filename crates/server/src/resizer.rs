use std::collections::HashMap;
use std::sync::Arc;

use ferropix_core::{ImageCodec, ResizeMode, SizeSpec, PASSTHROUGH_FORMAT};
use ferropix_pipeline::{passthrough, transform, MediaBody};
use ferropix_storage::{ObjectStore, StorageResult};
use tracing::debug;

/// One inbound resize invocation.
#[derive(Debug, Clone)]
pub struct ResizeRequest {
    pub container: String,
    pub key: String,
    /// Size token: a predefined name or a `WxH` literal.
    pub size: String,
    /// Output format token; unknown tokens encode as PNG.
    pub format: String,
    /// Resize mode token; unknown tokens crop.
    pub mode: String,
    pub is_video: bool,
}

/// The result stream handed back to the transport layer.
pub struct Media {
    pub content_type: String,
    pub body: MediaBody,
}

/// Decides, per request, between passthrough and the transform pipeline, and
/// wires the source fetch into whichever path wins.
pub struct ImageResizer {
    store: Arc<dyn ObjectStore>,
    sizes: Arc<HashMap<String, SizeSpec>>,
}

impl ImageResizer {
    pub fn new(store: Arc<dyn ObjectStore>, sizes: HashMap<String, SizeSpec>) -> Self {
        Self {
            store,
            sizes: Arc::new(sizes),
        }
    }

    /// Fetch `container/key` and return it resized per the request, or
    /// untouched when the request calls for passthrough (SVG output, video,
    /// the original-size sentinel, or a size token that resolved to
    /// nothing).
    ///
    /// Fetch failures surface here; transform failures surface as read-time
    /// errors on the returned stream. Either way the caller never sees a
    /// partial stream presented as complete.
    pub async fn resize(&self, request: ResizeRequest) -> StorageResult<Media> {
        let spec = if request.is_video {
            None
        } else {
            Some(SizeSpec::resolve(&request.size, &self.sizes))
        };

        let object = self
            .store
            .open_read(&request.container, &request.key)
            .await?;

        match spec {
            Some(spec)
                if spec.is_transformable() && request.format.to_lowercase() != PASSTHROUGH_FORMAT =>
            {
                let codec = ImageCodec::for_token(&request.format);
                let mode = ResizeMode::from_token(&request.mode);
                debug!(
                    container = %request.container,
                    key = %request.key,
                    width = spec.width,
                    height = spec.height,
                    ?codec,
                    ?mode,
                    "transforming object"
                );
                Ok(Media {
                    content_type: codec.content_type().to_string(),
                    body: transform(object.body, spec, codec, mode),
                })
            }
            _ => {
                debug!(
                    container = %request.container,
                    key = %request.key,
                    size = %request.size,
                    is_video = request.is_video,
                    "passing object through untouched"
                );
                Ok(Media {
                    content_type: object
                        .metadata
                        .content_type
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                    body: passthrough(object.body),
                })
            }
        }
    }
}
