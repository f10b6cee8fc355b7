//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//! This crate contains the database, authentication and upload storage
//! integrations.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - No external dependencies, in-memory stores only

pub mod auth;
pub mod database;
pub mod storage;

// Re-exports - always available
pub use auth::{Argon2PasswordService, InMemoryRevocationStore, JwtConfig, JwtTokenService};
pub use database::InMemoryDatabase;
pub use storage::LocalFileStorage;

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresCommentRepository, PostgresPostRepository, PostgresRevocationStore,
    PostgresUserRepository,
};
