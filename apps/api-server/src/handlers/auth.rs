//! Authentication handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::DomainError;
use inkwell_core::domain::User;
use inkwell_core::error::RepoError;
use inkwell_core::ports::AuthError;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{LoginDetails, LoginRequest, LoginResponse, SignupRequest, SignupResponse};

use super::form::{JsonOrForm, into_body};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Emails are compared case-insensitively and without surrounding spaces.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: JsonOrForm<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = into_body(body);

    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        present(req.first_name),
        present(req.last_name),
        present(req.email),
        present(req.password),
    ) else {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    };
    let email = normalize_email(&email);

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(DomainError::Duplicate("User already exists".to_string()).into());
    }

    let password_hash = state.passwords.hash(&password)?;
    let user = User::new(first_name, last_name, email, password_hash);

    // The unique index still catches a concurrent signup for the same email.
    let user = state.users.insert(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::BadRequest("User already exists".to_string()),
        other => other.into(),
    })?;

    let token = state.tokens.generate_token(user.id)?;
    tracing::info!(user_id = %user.id, "User signed up");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        SignupResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            img_url: user.avatar_url,
            token,
            expires_in: state.tokens.expiration_seconds(),
            is_active: user.is_active,
        },
        "User created successfully",
    )))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: JsonOrForm<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = into_body(body);

    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let user = state
        .users
        .find_by_email(&normalize_email(&email))
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.generate_token(user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        LoginResponse {
            token,
            expires_in: state.tokens.expiration_seconds(),
            details: LoginDetails {
                id: user.id,
                name: user.full_name(),
                email: user.email,
                img_url: user.avatar_url,
                is_active: user.is_active,
            },
        },
        "Login successful",
    )))
}

/// GET /auth/logout - revokes the presenting token only.
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state
        .revocations
        .revoke(identity.token_id, identity.expires_at)
        .await?;

    tracing::info!(user_id = %identity.user_id, "User logged out");
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out successfully")))
}
