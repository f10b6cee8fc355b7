//! Ownership policy shared by posts and comments.

use uuid::Uuid;

use crate::error::DomainError;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allow)
    }

    /// Turn a denial into [`DomainError::Forbidden`].
    pub fn ensure(self) -> Result<(), DomainError> {
        match self {
            Access::Allow => Ok(()),
            Access::Deny => Err(DomainError::Forbidden),
        }
    }
}

/// Only the resource owner may modify a resource. There are no roles and no
/// delegation: a post author has no rights over other users' comments.
pub fn can_modify(actor_id: Uuid, owner_id: Uuid) -> Access {
    if actor_id == owner_id {
        Access::Allow
    } else {
        Access::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_allowed() {
        let id = Uuid::new_v4();
        assert_eq!(can_modify(id, id), Access::Allow);
        assert!(can_modify(id, id).ensure().is_ok());
    }

    #[test]
    fn test_other_user_is_denied() {
        let access = can_modify(Uuid::new_v4(), Uuid::new_v4());

        assert!(!access.is_allowed());
        assert!(matches!(access.ensure(), Err(DomainError::Forbidden)));
    }
}
