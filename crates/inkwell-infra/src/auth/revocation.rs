//! In-memory token revocation list.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::ports::{AuthError, RevocationStore};

/// Revoked token ids with their expiry, behind an async RwLock.
///
/// Expired entries are dropped on every write, so the list never holds more
/// than the tokens revoked within one validity window.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut revoked = self.revoked.write().await;

        revoked.retain(|_, exp| *exp > now);
        if expires_at > now {
            revoked.insert(token_id, expires_at);
        }

        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, AuthError> {
        let revoked = self.revoked.read().await;
        Ok(revoked
            .get(&token_id)
            .is_some_and(|exp| *exp > Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn test_revoked_token_is_reported() {
        let store = InMemoryRevocationStore::new();
        let token_id = Uuid::new_v4();

        store
            .revoke(token_id, Utc::now() + TimeDelta::hours(1))
            .await
            .unwrap();

        assert!(store.is_revoked(token_id).await.unwrap());
        assert!(!store.is_revoked(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entries_are_purged_on_write() {
        let store = InMemoryRevocationStore::new();
        let stale = Uuid::new_v4();

        store.revoked.write().await.insert(stale, Utc::now() - TimeDelta::seconds(1));
        assert!(!store.is_revoked(stale).await.unwrap());

        store
            .revoke(Uuid::new_v4(), Utc::now() + TimeDelta::hours(1))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_already_expired_token_is_not_stored() {
        let store = InMemoryRevocationStore::new();

        store
            .revoke(Uuid::new_v4(), Utc::now() - TimeDelta::hours(1))
            .await
            .unwrap();

        assert_eq!(store.len().await, 0);
    }
}
