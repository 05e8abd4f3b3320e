use async_trait::async_trait;
use std::sync::Arc;

use super::{Tag, TagResponse};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::TagRepository;

pub const DEFAULT_TAG_SEARCH_SIZE: i64 = 10;
pub const MAX_TAG_SEARCH_SIZE: i64 = 100;

pub struct TagService {
    tag_repo: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tag_repo: Arc<dyn TagRepository>) -> Self {
        Self { tag_repo }
    }
}

#[async_trait]
pub trait TagServiceApi: Send + Sync {
    /// Register a tag in the catalog, returning the existing one when the name is taken.
    async fn save_tag(&self, name: &str) -> AppResult<Tag>;

    /// Tags whose name contains `fragment`, case-insensitively, ordered by lowercased name.
    async fn find_tags(&self, fragment: &str, size: Option<i64>) -> AppResult<Vec<TagResponse>>;
}

#[async_trait]
impl TagServiceApi for TagService {
    async fn save_tag(&self, name: &str) -> AppResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("tag name must not be blank".to_string()));
        }
        self.tag_repo.find_or_create(name).await
    }

    async fn find_tags(&self, fragment: &str, size: Option<i64>) -> AppResult<Vec<TagResponse>> {
        let size = size.unwrap_or(DEFAULT_TAG_SEARCH_SIZE);
        if !(1..=MAX_TAG_SEARCH_SIZE).contains(&size) {
            return Err(AppError::BadRequest(format!(
                "size must be between 1 and {MAX_TAG_SEARCH_SIZE}"
            )));
        }

        let tags = self.tag_repo.search(fragment.trim(), size).await?;
        tracing::debug!(fragment, size, found = tags.len(), "Tag search");
        Ok(tags.into_iter().map(TagResponse::from).collect())
    }
}
