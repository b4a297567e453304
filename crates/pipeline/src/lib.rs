pub mod encode;
pub mod error;
pub mod resize;
pub mod transform;

pub use encode::{encode_into, JPEG_QUALITY};
pub use error::{PipelineError, PipelineResult};
pub use resize::apply_mode;
pub use transform::{
    passthrough, transform, MediaBody, MAX_SOURCE_PIXELS, MAX_TARGET_DIMENSION, PIPE_CAPACITY,
};
