//! # Inkwell Shared
//!
//! Request and response types of the HTTP API.
//! Kept free of domain types so API clients can depend on it directly.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, ListResponse};
