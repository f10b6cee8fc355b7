//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional so that missing values surface as
//! validation messages instead of deserialization failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for creating or editing a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub search: Option<String>,
    /// `"true"` selects published posts, any other value drafts.
    pub is_published: Option<String>,
    pub author_id: Option<Uuid>,
}

/// Returned by signup: the new account plus its first token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub img_url: Option<String>,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub is_active: bool,
}

/// Returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub details: LoginDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginDetails {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub img_url: Option<String>,
    pub is_active: bool,
}

/// Profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub img_url: Option<String>,
}

/// A user's public information after a profile update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub img_url: Option<String>,
}

/// Author embedded in posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author: Option<AuthorSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub img_url: Option<String>,
    pub is_published: bool,
    pub author: Option<AuthorSummary>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pagination metadata of list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}
