pub mod error;
pub mod resizer;
pub mod routes;
pub mod server;

pub use error::{ServerError, ServerResult};
pub use resizer::{ImageResizer, Media, ResizeRequest};
pub use server::Server;
