/// Encoders the pipeline can produce output with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCodec {
    Jpeg,
    Gif,
    WebP,
    Png,
}

/// Format token that bypasses the transform entirely: SVG sources are served
/// as-is, before the encoder table is ever consulted.
pub const PASSTHROUGH_FORMAT: &str = "svg";

/// Token-to-encoder dispatch table. `avif` and `svg` intentionally collapse
/// onto the WebP encoder (`svg` only reaches this table when a caller skips
/// the passthrough check). Tokens absent from the table encode as PNG.
pub const ENCODER_TABLE: &[(&str, ImageCodec)] = &[
    ("jpeg", ImageCodec::Jpeg),
    ("jpg", ImageCodec::Jpeg),
    ("gif", ImageCodec::Gif),
    ("avif", ImageCodec::WebP),
    ("svg", ImageCodec::WebP),
    ("webp", ImageCodec::WebP),
];

pub const DEFAULT_CODEC: ImageCodec = ImageCodec::Png;

impl ImageCodec {
    /// Select the encoder for an output-format token. Case-insensitive;
    /// total over all strings via [`DEFAULT_CODEC`].
    pub fn for_token(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        ENCODER_TABLE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, codec)| *codec)
            .unwrap_or(DEFAULT_CODEC)
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Png => "image/png",
        }
    }
}
