//! # Inkwell API Server
//!
//! Route table, extractors and handlers for the blog backend. The binary in
//! `main.rs` wires these into an actix-web `HttpServer`; the integration tests
//! drive the same configuration through `actix_web::test`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
