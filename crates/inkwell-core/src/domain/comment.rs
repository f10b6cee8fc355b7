use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::policy::can_modify;
use super::post::Post;
use crate::error::DomainError;

/// Comment entity - attached to one post, owned by its author.
///
/// The author of the post has no rights over comments written by others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn require_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Content is required".to_string()));
    }
    Ok(())
}

impl Comment {
    /// Write a comment on `post`. The post must be published.
    pub fn new(post: &Post, author_id: Uuid, content: String) -> Result<Self, DomainError> {
        post.ensure_accepts_comments()?;
        require_content(&content)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            post_id: post.id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn belongs_to(&self, post_id: Uuid) -> bool {
        self.post_id == post_id
    }

    /// Independent of the post's state.
    pub fn edit(&mut self, actor_id: Uuid, content: String) -> Result<(), DomainError> {
        can_modify(actor_id, self.author_id).ensure()?;
        require_content(&content)?;

        self.content = content;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn authorize_delete(&self, actor_id: Uuid) -> Result<(), DomainError> {
        can_modify(actor_id, self.author_id).ensure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateConflict;

    fn published_post(author_id: Uuid) -> Post {
        let mut post = Post::new(author_id, "Title".to_string(), "Body".to_string(), None).unwrap();
        post.publish(author_id).unwrap();
        post
    }

    #[test]
    fn test_anyone_can_comment_on_published_post() {
        let post = published_post(Uuid::new_v4());
        let commenter = Uuid::new_v4();

        let comment = Comment::new(&post, commenter, "Nice".to_string()).unwrap();

        assert_eq!(comment.post_id, post.id);
        assert_eq!(comment.author_id, commenter);
        assert!(comment.belongs_to(post.id));
    }

    #[test]
    fn test_comment_on_draft_conflicts_before_validation() {
        let author = Uuid::new_v4();
        let post = Post::new(author, "Title".to_string(), "Body".to_string(), None).unwrap();

        let result = Comment::new(&post, author, String::new());

        assert!(matches!(
            result,
            Err(DomainError::Conflict(StateConflict::PostNotPublished))
        ));
    }

    #[test]
    fn test_comment_requires_content() {
        let post = published_post(Uuid::new_v4());
        let result = Comment::new(&post, Uuid::new_v4(), "   ".to_string());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_only_comment_author_can_modify() {
        let post_author = Uuid::new_v4();
        let commenter = Uuid::new_v4();
        let post = published_post(post_author);
        let mut comment = Comment::new(&post, commenter, "First".to_string()).unwrap();

        assert!(matches!(
            comment.edit(post_author, "Hijack".to_string()),
            Err(DomainError::Forbidden)
        ));
        assert!(matches!(
            comment.authorize_delete(post_author),
            Err(DomainError::Forbidden)
        ));
        assert_eq!(comment.content, "First");

        comment.edit(commenter, "Edited".to_string()).unwrap();
        assert_eq!(comment.content, "Edited");
        assert!(comment.authorize_delete(commenter).is_ok());
    }

    #[test]
    fn test_comment_stays_editable_after_unpublish() {
        let author = Uuid::new_v4();
        let commenter = Uuid::new_v4();
        let mut post = published_post(author);
        let mut comment = Comment::new(&post, commenter, "Hi".to_string()).unwrap();

        post.unpublish(author).unwrap();

        assert!(comment.edit(commenter, "Still here".to_string()).is_ok());
        assert!(Comment::new(&post, commenter, "Another".to_string()).is_err());
    }
}
