use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::policy::{Access, can_modify};
use super::publish::{PublishState, Transition};
use crate::error::{DomainError, StateConflict};

/// Post entity - a blog post owned by exactly one author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub state: PublishState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content edits. `None` and blank strings keep the current value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl Post {
    /// Create a new draft post.
    pub fn new(
        author_id: Uuid,
        title: String,
        content: String,
        image_url: Option<String>,
    ) -> Result<Self, DomainError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            image_url,
            state: PublishState::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_published(&self) -> bool {
        self.state.is_published()
    }

    pub fn access_for(&self, actor_id: Uuid) -> Access {
        can_modify(actor_id, self.author_id)
    }

    /// Ownership first, then state: a non-author never learns about state.
    pub fn authorize_edit(&self, actor_id: Uuid) -> Result<(), DomainError> {
        self.access_for(actor_id).ensure()?;
        if !self.state.allows_edit() {
            return Err(StateConflict::EditNotAllowed.into());
        }
        Ok(())
    }

    pub fn edit(&mut self, actor_id: Uuid, changes: PostChanges) -> Result<(), DomainError> {
        self.authorize_edit(actor_id)?;

        if let Some(title) = changes.title.filter(|s| !s.trim().is_empty()) {
            self.title = title;
        }
        if let Some(content) = changes.content.filter(|s| !s.trim().is_empty()) {
            self.content = content;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = Some(image_url);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn publish(&mut self, actor_id: Uuid) -> Result<(), DomainError> {
        self.transition(actor_id, Transition::Publish)
    }

    pub fn unpublish(&mut self, actor_id: Uuid) -> Result<(), DomainError> {
        self.transition(actor_id, Transition::Unpublish)
    }

    fn transition(&mut self, actor_id: Uuid, transition: Transition) -> Result<(), DomainError> {
        self.access_for(actor_id).ensure()?;
        self.state = self.state.apply(transition)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Deletion is allowed in either state.
    pub fn authorize_delete(&self, actor_id: Uuid) -> Result<(), DomainError> {
        self.access_for(actor_id).ensure()
    }

    pub fn ensure_accepts_comments(&self) -> Result<(), DomainError> {
        if self.state.accepts_comments() {
            Ok(())
        } else {
            Err(StateConflict::PostNotPublished.into())
        }
    }
}
