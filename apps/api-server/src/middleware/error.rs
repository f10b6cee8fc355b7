//! Error handling - every failure becomes a JSON body with a `message`.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode, web};
use inkwell_core::error::{DomainError, RepoError};
use inkwell_core::ports::{AuthError, StorageError};
use inkwell_shared::ErrorResponse;

/// Application-level error type rendered as an [`ErrorResponse`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg) => ErrorResponse::not_found(msg),
            AppError::BadRequest(msg) => ErrorResponse::bad_request(msg),
            AppError::Unauthorized(msg) => ErrorResponse::unauthorized(msg),
            AppError::Forbidden(msg) => ErrorResponse::forbidden(msg),
            AppError::Unprocessable(msg) => ErrorResponse::unprocessable(msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(msg) | DomainError::Duplicate(msg) => AppError::BadRequest(msg),
            DomainError::Unauthorized => AppError::Unauthorized("Invalid credentials".to_string()),
            DomainError::Forbidden => AppError::Forbidden("Forbidden: Not the author".to_string()),
            DomainError::Conflict(conflict) => AppError::Unprocessable(conflict.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!("Database constraint violated: {}", msg);
                AppError::Internal(format!("constraint: {msg}"))
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".to_string()),
            AuthError::InvalidToken(reason) => {
                tracing::debug!("Rejected token: {}", reason);
                AppError::Unauthorized("Invalid token".to_string())
            }
            AuthError::TokenRevoked => {
                AppError::Unauthorized("Token has been revoked".to_string())
            }
            AuthError::MissingAuth => {
                AppError::Unauthorized("Authentication required".to_string())
            }
            AuthError::HashingError(msg) => AppError::Internal(format!("password hashing: {msg}")),
            AuthError::Store(msg) => AppError::Internal(format!("revocation store: {msg}")),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Malformed JSON bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Malformed `application/x-www-form-urlencoded` bodies.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err: error::UrlencodedError, _: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Malformed query strings, e.g. a non-numeric `page`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Path segments that do not parse (a post id that is not a UUID) name no
/// resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_: error::PathError, _: &HttpRequest| {
        AppError::NotFound("Resource not found".to_string()).into()
    })
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use inkwell_core::StateConflict;
    use uuid::Uuid;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Post", Uuid::new_v4()), StatusCode::NOT_FOUND),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Duplicate("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (
                DomainError::Conflict(StateConflict::AlreadyPublished),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_not_found_names_the_entity() {
        let err = AppError::from(DomainError::not_found("Post", Uuid::new_v4()));
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Post not found"));
    }

    #[test]
    fn test_auth_errors_are_unauthorized_except_internal_failures() {
        assert_eq!(
            AppError::from(AuthError::TokenRevoked).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::MissingAuth).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::Store("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let resp = AppError::Internal("connection refused at 10.0.0.3".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Internal server error");
        assert!(!String::from_utf8_lossy(&body).contains("10.0.0.3"));
    }

    #[actix_web::test]
    async fn test_state_conflict_message_reaches_client() {
        let resp = AppError::from(DomainError::from(StateConflict::EditNotAllowed)).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], 422);
        assert_eq!(
            json["message"],
            "Post is already published. Unpublish before updating."
        );
    }
}
