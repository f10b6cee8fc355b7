//! Post listing filters and pagination.

use uuid::Uuid;

use super::post::Post;
use crate::error::DomainError;

/// Filters for the post collection. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub is_published: Option<bool>,
    pub author_id: Option<Uuid>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(search) = &self.search {
            if !post.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(is_published) = self.is_published {
            if post.is_published() != is_published {
                return false;
            }
        }
        if let Some(author_id) = self.author_id {
            if post.author_id != author_id {
                return false;
            }
        }
        true
    }
}

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_SIZE: u64 = 25;

    /// SQL `LIMIT`/`OFFSET` are signed 64-bit.
    const MAX_ROWS: u64 = i64::MAX as u64;

    pub fn new(page: u64, size: u64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::Validation("page must be at least 1".to_string()));
        }
        if size < 1 {
            return Err(DomainError::Validation("size must be at least 1".to_string()));
        }
        let in_range = size <= Self::MAX_ROWS
            && (page - 1)
                .checked_mul(size)
                .is_some_and(|offset| offset <= Self::MAX_ROWS);
        if !in_range {
            return Err(DomainError::Validation(
                "page and size are out of range".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            size: request.size(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, author_id: Uuid, published: bool) -> Post {
        let mut post = Post::new(author_id, title.to_string(), "Body".to_string(), None).unwrap();
        if published {
            post.publish(author_id).unwrap();
        }
        post
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = PostFilter::default();
        assert!(filter.matches(&post("Anything", Uuid::new_v4(), false)));
        assert!(filter.matches(&post("Else", Uuid::new_v4(), true)));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = PostFilter {
            search: Some("rUsT".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&post("Learning Rust today", Uuid::new_v4(), false)));
        assert!(!filter.matches(&post("Learning Go today", Uuid::new_v4(), false)));
    }

    #[test]
    fn test_filters_combine() {
        let author = Uuid::new_v4();
        let filter = PostFilter {
            search: None,
            is_published: Some(true),
            author_id: Some(author),
        };

        assert!(filter.matches(&post("A", author, true)));
        assert!(!filter.matches(&post("B", author, false)));
        assert!(!filter.matches(&post("C", Uuid::new_v4(), true)));
    }

    #[test]
    fn test_page_request_rejects_zero() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn test_page_request_offset_must_fit_sql_bigint() {
        assert!(PageRequest::new(1, u64::MAX).is_err());
        assert!(PageRequest::new(u64::MAX, 100).is_err());
        assert!(PageRequest::new(2, i64::MAX as u64).is_ok());
        assert!(PageRequest::new(3, i64::MAX as u64).is_err());

        let last = PageRequest::new(1 + i64::MAX as u64 / 50, 50).unwrap();
        assert!(last.offset() <= i64::MAX as u64);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(1, 10).unwrap();

        assert_eq!(Page::<()>::new(vec![], 0, request).total_pages(), 0);
        assert_eq!(Page::<()>::new(vec![], 10, request).total_pages(), 1);
        assert_eq!(Page::<()>::new(vec![], 11, request).total_pages(), 2);

        let single = PageRequest::new(1, 1).unwrap();
        assert_eq!(Page::<()>::new(vec![], 7, single).total_pages(), 7);
    }
}
