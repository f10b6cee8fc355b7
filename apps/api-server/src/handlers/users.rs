//! Profile of the authenticated user.

use actix_web::{HttpRequest, HttpResponse, web};

use inkwell_core::DomainError;
use inkwell_core::domain::{ProfileChanges, User};
use inkwell_shared::ApiResponse;

use super::form::FormInput;
use super::views::{profile, user_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", identity.user_id).into())
}

/// GET /user
pub async fn get_profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(profile(&user), "User profile")))
}

/// PUT /user - names and/or avatar.
pub async fn update_profile(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let mut form = FormInput::read(&req, payload, state.upload_max_bytes).await?;
    let mut user = current_user(&state, &identity).await?;

    let avatar_url = match form.take_file() {
        Some(upload) => Some(state.storage.store(upload).await?),
        None => None,
    };

    user.update_profile(ProfileChanges {
        first_name: form.text("first_name"),
        last_name: form.text("last_name"),
        avatar_url,
    });
    let user = state.users.update(user).await?;

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        user_response(&user),
        "User profile updated successfully",
    )))
}
