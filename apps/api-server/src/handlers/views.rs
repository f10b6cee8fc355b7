//! Response shapes for users, posts and comments.
//!
//! Posts are rendered together with their comments and the authors of both,
//! loaded with one query per relation rather than one per row.

use std::collections::HashMap;

use uuid::Uuid;

use inkwell_core::domain::{Comment, Post, User};
use inkwell_shared::dto::{AuthorSummary, CommentResponse, PostResponse, ProfileResponse, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub fn author_summary(user: &User) -> AuthorSummary {
    AuthorSummary {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        img_url: user.avatar_url.clone(),
    }
}

pub fn profile(user: &User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        name: user.full_name(),
        email: user.email.clone(),
        img_url: user.avatar_url.clone(),
    }
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        img_url: user.avatar_url.clone(),
    }
}

fn comment_view(comment: Comment, authors: &HashMap<Uuid, User>) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author: authors.get(&comment.author_id).map(author_summary),
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

async fn load_authors(state: &AppState, ids: &[Uuid]) -> AppResult<HashMap<Uuid, User>> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let users = state.users.find_by_ids(&ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

/// Render posts in the given order, each with its comments oldest first.
pub async fn render_posts(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostResponse>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let comments = state.comments.find_by_post_ids(&post_ids).await?;

    let author_ids: Vec<Uuid> = posts
        .iter()
        .map(|p| p.author_id)
        .chain(comments.iter().map(|c| c.author_id))
        .collect();
    let authors = load_authors(state, &author_ids).await?;

    let mut by_post: HashMap<Uuid, Vec<CommentResponse>> = HashMap::new();
    for comment in comments {
        by_post
            .entry(comment.post_id)
            .or_default()
            .push(comment_view(comment, &authors));
    }

    Ok(posts
        .into_iter()
        .map(|post| PostResponse {
            id: post.id,
            author: authors.get(&post.author_id).map(author_summary),
            comments: by_post.remove(&post.id).unwrap_or_default(),
            is_published: post.is_published(),
            title: post.title,
            content: post.content,
            img_url: post.image_url,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
        .collect())
}

pub async fn render_post(state: &AppState, post: Post) -> AppResult<PostResponse> {
    render_posts(state, vec![post])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("post vanished while rendering".to_string()))
}

pub async fn render_comment(state: &AppState, comment: Comment) -> AppResult<CommentResponse> {
    let authors = load_authors(state, &[comment.author_id]).await?;
    Ok(comment_view(comment, &authors))
}
