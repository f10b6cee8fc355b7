//! Application configuration loaded from environment variables.

use std::env;

use actix_web::http::Uri;
use std::path::PathBuf;

use inkwell_infra::JwtConfig;
#[cfg(feature = "postgres")]
use inkwell_infra::database::DatabaseConfig;

/// Largest accepted upload, in bytes.
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Directory uploaded images are written to and served from.
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database,
            jwt: JwtConfig::from_env(),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            upload_max_bytes: parse_var("UPLOAD_MAX_BYTES").unwrap_or(DEFAULT_UPLOAD_MAX_BYTES),
            cors_origins: env::var("CORS_ORIGIN")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Comma-separated `scheme://host[:port]` origins. Wildcards and malformed
/// entries are dropped with a warning.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .filter(|origin| {
            let valid = origin
                .parse::<Uri>()
                .is_ok_and(|uri| uri.scheme().is_some() && uri.authority().is_some());
            if !valid {
                tracing::warn!(origin, "Ignoring invalid CORS_ORIGIN entry");
            }
            valid
        })
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_keeps_valid_entries() {
        assert_eq!(
            parse_origins(" https://blog.example.com/ ,http://localhost:3000,,*,blog.example.com"),
            vec!["https://blog.example.com", "http://localhost:3000"]
        );
        assert!(parse_origins("").is_empty());
    }
}
