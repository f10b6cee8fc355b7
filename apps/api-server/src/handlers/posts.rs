//! Post handlers: listing, CRUD and the publish transitions.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use inkwell_core::DomainError;
use inkwell_core::domain::{PageRequest, Post, PostChanges, PostFilter};
use inkwell_shared::dto::{ListPostsQuery, PageMeta};
use inkwell_shared::{ApiResponse, ListResponse};

use super::form::FormInput;
use super::views::{render_post, render_posts};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(super) async fn load_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id).into())
}

fn filter_from_query(query: &ListPostsQuery) -> PostFilter {
    PostFilter {
        search: query.search.clone().filter(|s| !s.is_empty()),
        is_published: query.is_published.as_deref().map(|v| v == "true"),
        author_id: query.author_id,
    }
}

/// GET /posts
pub async fn list_posts(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let request = PageRequest::new(
        query.page.unwrap_or(PageRequest::DEFAULT_PAGE),
        query.size.unwrap_or(PageRequest::DEFAULT_SIZE),
    )?;

    let page = state.posts.find_page(&filter_from_query(&query), request).await?;
    let meta = PageMeta {
        total: page.total,
        page: page.page,
        size: page.size,
        total_pages: page.total_pages(),
    };

    Ok(HttpResponse::Ok().json(ListResponse {
        data: render_posts(&state, page.items).await?,
        meta,
    }))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(render_post(&state, post).await?)))
}

/// POST /posts/create
pub async fn create_post(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let mut form = FormInput::read(&req, payload, state.upload_max_bytes).await?;

    let mut post = Post::new(
        identity.user_id,
        form.text("title").unwrap_or_default(),
        form.text("content").unwrap_or_default(),
        None,
    )
    .map_err(|e| match e {
        DomainError::Validation(msg) => AppError::Unprocessable(msg),
        other => other.into(),
    })?;

    if let Some(upload) = form.take_file() {
        post.image_url = Some(state.storage.store(upload).await?);
    }

    let post = state.posts.insert(post).await?;
    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        render_post(&state, post).await?,
        "Post created successfully",
    )))
}

/// PUT /posts/{id} - drafts only.
pub async fn update_post(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut form = FormInput::read(&req, payload, state.upload_max_bytes).await?;
    let mut post = load_post(&state, path.into_inner()).await?;

    post.authorize_edit(identity.user_id)?;

    let image_url = match form.take_file() {
        Some(upload) => Some(state.storage.store(upload).await?),
        None => None,
    };

    post.edit(
        identity.user_id,
        PostChanges {
            title: form.text("title"),
            content: form.text("content"),
            image_url,
        },
    )?;
    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, "Post updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        render_post(&state, post).await?,
        "Post updated successfully",
    )))
}

/// DELETE /posts/{id} - removes the post and its comments.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    post.authorize_delete(identity.user_id)?;

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

/// PATCH /posts/{id}/publish
pub async fn publish_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut post = load_post(&state, path.into_inner()).await?;
    post.publish(identity.user_id)?;

    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, "Post published");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        render_post(&state, post).await?,
        "Post published successfully",
    )))
}

/// PATCH /posts/{id}/unpublish
pub async fn unpublish_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut post = load_post(&state, path.into_inner()).await?;
    post.unpublish(identity.user_id)?;

    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, "Post unpublished");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        render_post(&state, post).await?,
        "Post unpublished successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_published_only_true_selects_published() {
        let query = |v: &str| ListPostsQuery {
            is_published: Some(v.to_string()),
            ..Default::default()
        };

        assert_eq!(filter_from_query(&query("true")).is_published, Some(true));
        assert_eq!(filter_from_query(&query("false")).is_published, Some(false));
        assert_eq!(filter_from_query(&query("yes")).is_published, Some(false));
        assert_eq!(filter_from_query(&ListPostsQuery::default()).is_published, None);
    }

    #[test]
    fn test_empty_search_is_ignored() {
        let query = ListPostsQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(filter_from_query(&query).search.is_none());
    }
}
