use std::io::Write;

use ferropix_core::ImageCodec;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageError};

use crate::error::{PipelineError, PipelineResult};

pub const JPEG_QUALITY: u8 = 85;

/// Encode `image` with the selected codec into `out`. The sink sees encoded
/// bytes as the codec produces them, so a flow-controlled sink throttles the
/// encoder.
pub fn encode_into<W: Write>(
    image: &DynamicImage,
    codec: ImageCodec,
    out: &mut W,
) -> PipelineResult<()> {
    let result = match codec {
        ImageCodec::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(out, JPEG_QUALITY);
            // JPEG has no alpha channel.
            image.to_rgb8().write_with_encoder(encoder)
        }
        ImageCodec::Png => {
            let encoder = PngEncoder::new(out);
            image.write_with_encoder(encoder)
        }
        ImageCodec::WebP => {
            // The image crate's WebP encoder is lossless-only and accepts
            // RGB8/RGBA8 input.
            let encoder = WebPEncoder::new_lossless(out);
            image.to_rgba8().write_with_encoder(encoder)
        }
        ImageCodec::Gif => {
            let mut encoder = GifEncoder::new(out);
            let rgba = image.to_rgba8();
            let (width, height) = (rgba.width(), rgba.height());
            encoder.encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        }
    };

    result.map_err(map_encode_error)
}

/// A sink that vanished mid-encode means the consumer hung up, not a codec
/// defect.
fn map_encode_error(err: ImageError) -> PipelineError {
    if let ImageError::IoError(io_err) = &err {
        if io_err.kind() == std::io::ErrorKind::BrokenPipe {
            return PipelineError::ConsumerAborted;
        }
    }
    PipelineError::Encode(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(codec: ImageCodec) -> Vec<u8> {
        let image = DynamicImage::new_rgb8(10, 10);
        let mut buf = Vec::new();
        encode_into(&image, codec, &mut buf).unwrap();
        assert!(!buf.is_empty());
        buf
    }

    #[test]
    fn test_encode_jpeg() {
        let data = encode(ImageCodec::Jpeg);
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png() {
        let data = encode(ImageCodec::Png);
        assert_eq!(
            &data[0..8],
            &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn test_encode_webp() {
        let data = encode(ImageCodec::WebP);
        assert_eq!(&data[0..4], b"RIFF");
    }

    #[test]
    fn test_encode_gif() {
        let data = encode(ImageCodec::Gif);
        assert_eq!(&data[0..3], b"GIF");
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "sink closed",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_sink_maps_to_consumer_aborted() {
        let image = DynamicImage::new_rgb8(10, 10);
        let result = encode_into(&image, ImageCodec::Png, &mut BrokenSink);
        assert!(matches!(result, Err(PipelineError::ConsumerAborted)));
    }
}
