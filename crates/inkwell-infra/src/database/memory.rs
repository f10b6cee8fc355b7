//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All three repositories share one set of tables so that deleting a post
//! also removes its comments, mirroring the foreign keys of the SQL schema.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Comment, Page, PageRequest, Post, PostFilter, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

use super::mask_email;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    /// Insertion order is creation order.
    comments: Vec<Comment>,
}

/// Shared handle to the in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryCommentRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users.email must be unique".to_string()));
        }
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users.id must be unique".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepoError::Constraint("users.email must be unique".to_string()));
        }

        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let post_ids: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|_, p| p.author_id != id);
        tables
            .comments
            .retain(|c| c.author_id != id && !post_ids.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint("posts.author_id must reference a user".to_string()));
        }
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts.id must be unique".to_string()));
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables.posts.values().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page::new(items, total, page))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(
                "comments.post_id must reference a post".to_string(),
            ));
        }
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint("comments.id must be unique".to_string()));
        }

        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        tables.comments.remove(index);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post_ids(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    async fn seed_user(db: &InMemoryDatabase, email: &str) -> User {
        db.users()
            .insert(User::new(
                "Test".to_string(),
                "User".to_string(),
                email.to_string(),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn seed_post(db: &InMemoryDatabase, author: &User, title: &str, age_minutes: i64) -> Post {
        let mut post =
            Post::new(author.id, title.to_string(), "Body".to_string(), None).unwrap();
        post.created_at = Utc::now() - TimeDelta::minutes(age_minutes);
        db.posts().insert(post).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_violation() {
        let db = InMemoryDatabase::new();
        seed_user(&db, "dup@example.com").await;

        let result = db
            .users()
            .insert(User::new(
                "Other".to_string(),
                "User".to_string(),
                "dup@example.com".to_string(),
                "hash".to_string(),
            ))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert!(db.users().find_by_email("dup@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_page_orders_newest_first_and_paginates() {
        let db = InMemoryDatabase::new();
        let author = seed_user(&db, "a@example.com").await;
        seed_post(&db, &author, "oldest", 30).await;
        seed_post(&db, &author, "middle", 20).await;
        seed_post(&db, &author, "newest", 10).await;

        let first = db
            .posts()
            .find_page(&PostFilter::default(), PageRequest::new(1, 2).unwrap())
            .await
            .unwrap();
        let second = db
            .posts()
            .find_page(&PostFilter::default(), PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();

        let titles: Vec<_> = first.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle"]);
        assert_eq!(first.total, 3);
        assert_eq!(first.total_pages(), 2);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].title, "oldest");
    }

    #[tokio::test]
    async fn test_find_page_applies_filter_to_total() {
        let db = InMemoryDatabase::new();
        let author = seed_user(&db, "a@example.com").await;
        let mut published = seed_post(&db, &author, "Published Rust", 5).await;
        published.publish(author.id).unwrap();
        db.posts().update(published).await.unwrap();
        seed_post(&db, &author, "Draft Rust", 4).await;

        let page = db
            .posts()
            .find_page(
                &PostFilter {
                    is_published: Some(true),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert!(page.items.iter().all(Post::is_published));
    }

    #[tokio::test]
    async fn test_deleting_post_removes_its_comments() {
        let db = InMemoryDatabase::new();
        let author = seed_user(&db, "a@example.com").await;
        let mut post = seed_post(&db, &author, "Post", 1).await;
        post.publish(author.id).unwrap();
        let post = db.posts().update(post).await.unwrap();

        let first = Comment::new(&post, author.id, "first".to_string()).unwrap();
        let second = Comment::new(&post, author.id, "second".to_string()).unwrap();
        db.comments().insert(first).await.unwrap();
        db.comments().insert(second).await.unwrap();

        let listed = db.comments().find_by_post_ids(&[post.id]).await.unwrap();
        let contents: Vec<_> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);

        db.posts().delete(post.id).await.unwrap();

        assert!(db.comments().find_by_post_ids(&[post.id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_entity_is_not_found() {
        let db = InMemoryDatabase::new();
        let author = seed_user(&db, "a@example.com").await;
        let post = Post::new(author.id, "T".to_string(), "C".to_string(), None).unwrap();

        assert!(matches!(db.posts().update(post).await, Err(RepoError::NotFound)));
    }
}
