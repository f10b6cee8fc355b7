//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use inkwell_core::domain::{Comment, Page, PageRequest, Post, PostFilter, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    AuthError, CommentRepository, PostRepository, RevocationStore, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::revoked_token::{self, Entity as RevokedTokenEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_pattern(search: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let condition = Condition::all()
            .add_option(filter.search.as_deref().map(|search| {
                Expr::expr(Func::lower(Expr::col(post::Column::Title))).like(like_pattern(search))
            }))
            .add_option(
                filter
                    .is_published
                    .map(|is_published| post::Column::IsPublished.eq(is_published)),
            )
            .add_option(
                filter
                    .author_id
                    .map(|author_id| post::Column::AuthorId.eq(author_id)),
            );

        let query = PostEntity::find().filter(condition);

        let total = query.clone().count(&self.db).await.map_err(map_db_err)?;
        let models = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(page.size())
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post_ids(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Revocation list in the `revoked_tokens` table, shared by all instances.
pub struct PostgresRevocationStore {
    db: DbConn,
}

impl PostgresRevocationStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RevocationStore for PostgresRevocationStore {
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let now = Utc::now();

        let purged = RevokedTokenEntity::delete_many()
            .filter(revoked_token::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        if purged.rows_affected > 0 {
            tracing::debug!(purged = purged.rows_affected, "Purged expired token revocations");
        }

        let entry = revoked_token::ActiveModel {
            token_id: Set(token_id),
            expires_at: Set(expires_at.into()),
        };

        RevokedTokenEntity::insert(entry)
            .on_conflict(
                OnConflict::column(revoked_token::Column::TokenId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, AuthError> {
        let entry = RevokedTokenEntity::find_by_id(token_id)
            .filter(revoked_token::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(entry.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::domain::PublishState;
    use inkwell_core::ports::BaseRepository;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn post_model(id: Uuid, author_id: Uuid, is_published: bool) -> post::Model {
        let now = Utc::now();
        post::Model {
            id,
            author_id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            image_url: None,
            is_published,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id_maps_publish_state() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, author_id, true)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, author_id);
        assert_eq!(post.state, PublishState::Published);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_page_far_past_the_end_is_empty() {
        let author_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(3)))])]])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let filter = PostFilter {
            author_id: Some(author_id),
            ..Default::default()
        };
        let request = PageRequest::new(1 + i64::MAX as u64 / 50, 50).unwrap();

        let page = repo.find_page(&filter, request).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, request.page());
    }

    #[tokio::test]
    async fn test_find_page_returns_rows_and_total() {
        let author_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(5)))])]])
            .append_query_results([vec![
                post_model(Uuid::new_v4(), author_id, true),
                post_model(Uuid::new_v4(), author_id, false),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let page = repo
            .find_page(&PostFilter::default(), PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_find_by_ids_with_no_ids_skips_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresUserRepository::new(db);

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let pattern = like_pattern("50%_Off");
        let expected = LikeExpr::new("%50\\%\\_off%").escape('\\');
        assert_eq!(format!("{pattern:?}"), format!("{expected:?}"));
    }
}
