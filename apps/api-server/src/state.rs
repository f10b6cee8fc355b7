//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    CommentRepository, FileStorage, PasswordService, PostRepository, RevocationStore,
    TokenService, UserRepository,
};
use inkwell_infra::{
    Argon2PasswordService, InMemoryDatabase, InMemoryRevocationStore, JwtConfig, JwtTokenService,
    LocalFileStorage,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub revocations: Arc<dyn RevocationStore>,
    pub storage: Arc<dyn FileStorage>,
    pub upload_max_bytes: usize,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// PostgreSQL is used when `DATABASE_URL` is set; a configured database
    /// that cannot be reached is a startup error.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(&config.upload_dir)?);

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            use inkwell_infra::database::connect;
            use inkwell_infra::{
                PostgresCommentRepository, PostgresPostRepository, PostgresRevocationStore,
                PostgresUserRepository,
            };

            let conn = connect(db_config).await.map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                std::io::Error::other(e)
            })?;

            tracing::info!("Application state initialized (postgres)");
            return Ok(Self {
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
                tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
                passwords: Arc::new(Argon2PasswordService::new()),
                revocations: Arc::new(PostgresRevocationStore::new(conn)),
                storage,
                upload_max_bytes: config.upload_max_bytes,
            });
        }

        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        Ok(Self::in_memory(
            config.jwt.clone(),
            storage,
            config.upload_max_bytes,
        ))
    }

    /// State backed entirely by process memory. Data is lost on restart.
    pub fn in_memory(jwt: JwtConfig, storage: Arc<dyn FileStorage>, upload_max_bytes: usize) -> Self {
        let db = InMemoryDatabase::new();

        Self {
            users: Arc::new(db.users()),
            posts: Arc::new(db.posts()),
            comments: Arc::new(db.comments()),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            revocations: Arc::new(InMemoryRevocationStore::new()),
            storage,
            upload_max_bytes,
        }
    }
}
