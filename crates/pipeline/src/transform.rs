use std::io::{Cursor, Write};
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use ferropix_core::{ImageCodec, ResizeMode, SizeSpec};
use ferropix_storage::ObjectBody;
use futures_util::{Stream, StreamExt};
use image::{DynamicImage, ImageReader};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

use crate::encode::encode_into;
use crate::error::{PipelineError, PipelineResult};
use crate::resize::apply_mode;

/// Read end of the transform pipe. Producer-side failures surface as `Err`
/// items; the stream never ends early without one.
pub type MediaBody = Pin<Box<dyn Stream<Item = Result<Bytes, PipelineError>> + Send>>;

/// Encoded chunks buffered in the pipe before the producer suspends.
pub const PIPE_CAPACITY: usize = 8;

/// Size of one encoded chunk on the pipe.
const ENCODE_CHUNK: usize = 64 * 1024;

/// Sources beyond this pixel count are rejected before decoding.
pub const MAX_SOURCE_PIXELS: u64 = 100_000_000;

/// Largest accepted target edge.
pub const MAX_TARGET_DIMENSION: u32 = 8192;

/// Run decode -> resize -> encode against `source` as an independent task,
/// returning the read end of a bounded pipe immediately.
///
/// The caller reads encoded bytes as the producer emits them; a full pipe
/// suspends the producer (backpressure), and a dropped reader cancels it.
/// The producer owns `source` and the decoded image and releases both
/// exactly once, on every path. A spec with no concrete dimensions skips the
/// transform and forwards the source bytes unchanged.
pub fn transform(
    source: ObjectBody,
    spec: SizeSpec,
    codec: ImageCodec,
    mode: ResizeMode,
) -> MediaBody {
    if !spec.is_transformable() {
        return passthrough(source);
    }

    let (tx, rx) = mpsc::channel::<Result<Bytes, PipelineError>>(PIPE_CAPACITY);

    tokio::spawn(async move {
        match produce(source, spec, codec, mode, tx.clone()).await {
            Ok(()) => {}
            Err(PipelineError::ConsumerAborted) => {
                debug!("consumer went away mid-transform");
            }
            Err(err) => {
                error!(error = %err, "transform failed");
                // Carry the failure to the consumer's next read; if the
                // consumer is already gone there is nobody left to tell.
                let _ = tx.send(Err(err)).await;
            }
        }
    });

    Box::pin(ReceiverStream::new(rx))
}

/// Forward source bytes unchanged, re-tagging read errors.
pub fn passthrough(source: ObjectBody) -> MediaBody {
    Box::pin(source.map(|chunk| chunk.map_err(PipelineError::Source)))
}

async fn produce(
    mut source: ObjectBody,
    spec: SizeSpec,
    codec: ImageCodec,
    mode: ResizeMode,
    tx: mpsc::Sender<Result<Bytes, PipelineError>>,
) -> PipelineResult<()> {
    if spec.width > MAX_TARGET_DIMENSION || spec.height > MAX_TARGET_DIMENSION {
        return Err(PipelineError::TargetTooLarge {
            width: spec.width,
            height: spec.height,
        });
    }

    // Drain the source fully; bitmap decoding needs the whole byte range
    // before any pixel is addressable.
    let mut raw = BytesMut::new();
    while let Some(chunk) = source.next().await {
        if tx.is_closed() {
            return Err(PipelineError::ConsumerAborted);
        }
        raw.extend_from_slice(&chunk?);
    }
    drop(source);
    let raw = raw.freeze();

    // Decode, resize, and encode are CPU bound; run them off the async
    // threads. Encoded chunks flow through the bounded channel, so a full
    // pipe suspends the encoder inside `blocking_send`.
    let blocking = tokio::task::spawn_blocking(move || {
        let image = decode(&raw)?;
        drop(raw);
        let image = apply_mode(image, spec.width, spec.height, mode);

        let mut writer = PipeWriter::new(tx);
        encode_into(&image, codec, &mut writer)?;
        drop(image);
        writer.finish()
    });

    blocking
        .await
        .map_err(|join_err| PipelineError::Internal(join_err.to_string()))?
}

fn decode(raw: &Bytes) -> PipelineResult<DynamicImage> {
    let (width, height) = ImageReader::new(Cursor::new(raw.as_ref()))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| PipelineError::Decode(e.to_string()))?;

    if width as u64 * height as u64 > MAX_SOURCE_PIXELS {
        return Err(PipelineError::SourceTooLarge { width, height });
    }

    ImageReader::new(Cursor::new(raw.as_ref()))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| PipelineError::Decode(e.to_string()))
}

/// `std::io::Write` adapter over the pipe's write end. Accumulates encoder
/// output into fixed-size chunks and sends them with `blocking_send`, which
/// suspends when the pipe is full and fails with `BrokenPipe` once the
/// consumer is gone.
struct PipeWriter {
    tx: mpsc::Sender<Result<Bytes, PipelineError>>,
    buf: BytesMut,
}

impl PipeWriter {
    fn new(tx: mpsc::Sender<Result<Bytes, PipelineError>>) -> Self {
        Self {
            tx,
            buf: BytesMut::with_capacity(ENCODE_CHUNK),
        }
    }

    fn send(&mut self, chunk: Bytes) -> std::io::Result<()> {
        self.tx.blocking_send(Ok(chunk)).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe consumer dropped")
        })
    }

    /// Flush the tail chunk and close the write end.
    fn finish(mut self) -> PipelineResult<()> {
        self.flush().map_err(|_| PipelineError::ConsumerAborted)
    }
}

impl Write for PipeWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(data);
        while self.buf.len() >= ENCODE_CHUNK {
            let chunk = self.buf.split_to(ENCODE_CHUNK).freeze();
            self.send(chunk)?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buf.is_empty() {
            let chunk = self.buf.split().freeze();
            self.send(chunk)?;
        }
        Ok(())
    }
}
