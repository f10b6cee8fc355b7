//! Comments on published posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::DomainError;
use inkwell_core::domain::Comment;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::CommentRequest;

use super::form::{JsonOrForm, into_body};
use super::posts::load_post;
use super::views::render_comment;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn content_of(body: Option<JsonOrForm<CommentRequest>>) -> String {
    body.and_then(|b| into_body(b).content).unwrap_or_default()
}

/// A comment addressed through a post it does not belong to is not found.
async fn load_comment(state: &AppState, post_id: Uuid, comment_id: Uuid) -> AppResult<Comment> {
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.belongs_to(post_id))
        .ok_or_else(|| DomainError::not_found("Comment", comment_id).into())
}

/// POST /posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Option<JsonOrForm<CommentRequest>>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    let comment = Comment::new(&post, identity.user_id, content_of(body))?;

    let comment = state.comments.insert(comment).await?;
    tracing::info!(post_id = %post.id, comment_id = %comment.id, "Comment added");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        render_comment(&state, comment).await?,
        "Comment added successfully",
    )))
}

/// PUT /posts/{id}/comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: Option<JsonOrForm<CommentRequest>>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = load_comment(&state, post_id, comment_id).await?;

    comment.edit(identity.user_id, content_of(body))?;
    let comment = state.comments.update(comment).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        render_comment(&state, comment).await?,
        "Comment updated successfully",
    )))
}

/// DELETE /posts/{id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = load_comment(&state, post_id, comment_id).await?;

    comment.authorize_delete(identity.user_id)?;
    state.comments.delete(comment.id).await?;
    tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted successfully")))
}
