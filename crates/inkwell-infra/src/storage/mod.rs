//! Upload storage implementations.

mod local;

pub use local::{LocalFileStorage, UPLOADS_PREFIX};
