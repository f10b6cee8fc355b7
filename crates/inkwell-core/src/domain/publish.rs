//! Post publish lifecycle.

use serde::{Deserialize, Serialize};

use crate::error::StateConflict;

/// Visibility state of a post. New posts start as drafts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    #[default]
    Draft,
    Published,
}

/// A requested lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Publish,
    Unpublish,
}

impl PublishState {
    pub fn from_published(is_published: bool) -> Self {
        if is_published {
            PublishState::Published
        } else {
            PublishState::Draft
        }
    }

    pub fn is_published(self) -> bool {
        self == PublishState::Published
    }

    /// Transition table. Anything not listed is a conflict.
    pub fn apply(self, transition: Transition) -> Result<Self, StateConflict> {
        match (self, transition) {
            (PublishState::Draft, Transition::Publish) => Ok(PublishState::Published),
            (PublishState::Published, Transition::Unpublish) => Ok(PublishState::Draft),
            (PublishState::Published, Transition::Publish) => Err(StateConflict::AlreadyPublished),
            (PublishState::Draft, Transition::Unpublish) => Err(StateConflict::AlreadyDraft),
        }
    }

    /// Title, content and image may only change while drafting.
    pub fn allows_edit(self) -> bool {
        self == PublishState::Draft
    }

    pub fn accepts_comments(self) -> bool {
        self == PublishState::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_posts_are_drafts() {
        assert_eq!(PublishState::default(), PublishState::Draft);
        assert!(!PublishState::default().is_published());
    }

    #[test]
    fn test_publish_and_unpublish_cycle() {
        let state = PublishState::Draft;

        let state = state.apply(Transition::Publish).unwrap();
        assert_eq!(state, PublishState::Published);

        let state = state.apply(Transition::Unpublish).unwrap();
        assert_eq!(state, PublishState::Draft);

        let state = state.apply(Transition::Publish).unwrap();
        assert_eq!(state, PublishState::Published);
    }

    #[test]
    fn test_repeated_transitions_conflict() {
        assert_eq!(
            PublishState::Published.apply(Transition::Publish),
            Err(StateConflict::AlreadyPublished)
        );
        assert_eq!(
            PublishState::Draft.apply(Transition::Unpublish),
            Err(StateConflict::AlreadyDraft)
        );
    }

    #[test]
    fn test_edit_and_comment_rules() {
        assert!(PublishState::Draft.allows_edit());
        assert!(!PublishState::Published.allows_edit());
        assert!(PublishState::Published.accepts_comments());
        assert!(!PublishState::Draft.accepts_comments());
    }
}
