use ferropix_storage::StorageError;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures observable on the transform pipe. All variants are terminal for
/// the request; none are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source stream failed: {0}")]
    Source(#[from] StorageError),

    #[error("failed to decode source image: {0}")]
    Decode(String),

    #[error("source image too large: {width}x{height}")]
    SourceTooLarge { width: u32, height: u32 },

    #[error("target size too large: {width}x{height}")]
    TargetTooLarge { width: u32, height: u32 },

    #[error("failed to encode output image: {0}")]
    Encode(String),

    /// The consumer stopped reading before the transform finished. Caller
    /// driven, not a defect; never logged as an error.
    #[error("consumer disconnected before the transform finished")]
    ConsumerAborted,

    #[error("transform task failed: {0}")]
    Internal(String),
}

impl From<PipelineError> for std::io::Error {
    fn from(err: PipelineError) -> Self {
        let kind = match &err {
            PipelineError::ConsumerAborted => std::io::ErrorKind::BrokenPipe,
            PipelineError::Source(StorageError::NotFound(_)) => std::io::ErrorKind::NotFound,
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
