use super::error::FeedServiceError;
use crate::domain::feed::{
    Feed, FeedListQuery, FeedPatchRequest, FeedPostRequest, FeedResponse, NewFeed, UploadedImage,
};
use crate::domain::shared::validate_request;
use crate::infrastructure::repositories::{FeedRepository, LikeRepository, MemberRepository};
use crate::infrastructure::storage::{ImageStore, ImageStoreError};
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct FeedService {
    feed_repo: Arc<dyn FeedRepository>,
    member_repo: Arc<dyn MemberRepository>,
    like_repo: Arc<dyn LikeRepository>,
    image_store: Arc<ImageStore>,
}

impl FeedService {
    pub fn new(
        feed_repo: Arc<dyn FeedRepository>,
        member_repo: Arc<dyn MemberRepository>,
        like_repo: Arc<dyn LikeRepository>,
        image_store: Arc<ImageStore>,
    ) -> Self {
        Self {
            feed_repo,
            member_repo,
            like_repo,
            image_store,
        }
    }
}

#[async_trait]
pub trait FeedServiceApi: Send + Sync {
    async fn post_feed(
        &self,
        member_id: i64,
        request: FeedPostRequest,
        image: Option<UploadedImage>,
    ) -> Result<FeedResponse, FeedServiceError>;

    async fn find_feed_by_id(
        &self,
        member_id: i64,
        feed_id: i64,
    ) -> Result<FeedResponse, FeedServiceError>;

    async fn find_all(
        &self,
        member_id: i64,
        query: FeedListQuery,
    ) -> Result<Vec<FeedResponse>, FeedServiceError>;

    async fn update_feed(
        &self,
        member_id: i64,
        feed_id: i64,
        request: FeedPatchRequest,
    ) -> Result<FeedResponse, FeedServiceError>;

    async fn delete_feed(&self, member_id: i64, feed_id: i64) -> Result<(), FeedServiceError>;

    async fn do_like(&self, member_id: i64, feed_id: i64) -> Result<(), FeedServiceError>;

    async fn cancel_like(&self, member_id: i64, feed_id: i64) -> Result<(), FeedServiceError>;
}

#[async_trait]
impl FeedServiceApi for FeedService {
    async fn post_feed(
        &self,
        member_id: i64,
        request: FeedPostRequest,
        image: Option<UploadedImage>,
    ) -> Result<FeedResponse, FeedServiceError> {
        validate_request(&request)?;
        self.member_repo
            .find_by_id(member_id)
            .await?
            .ok_or(FeedServiceError::MemberNotFound)?;

        let image_path = match image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let new_feed = NewFeed {
            member_id,
            contents: request.contents,
            location: request.location,
            tags: request.tags,
            image_path: image_path.clone(),
        };

        let feed = match self.feed_repo.create(new_feed).await {
            Ok(feed) => feed,
            Err(err) => {
                if let Some(path) = image_path {
                    self.discard_image(&path).await;
                }
                return Err(err.into());
            }
        };

        tracing::info!(feed_id = feed.id, member_id, tags = feed.tags.len(), "Feed posted");
        self.to_response(feed, member_id).await
    }

    async fn find_feed_by_id(
        &self,
        member_id: i64,
        feed_id: i64,
    ) -> Result<FeedResponse, FeedServiceError> {
        let feed = self.find_feed(feed_id).await?;
        self.to_response(feed, member_id).await
    }

    async fn find_all(
        &self,
        member_id: i64,
        query: FeedListQuery,
    ) -> Result<Vec<FeedResponse>, FeedServiceError> {
        let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(FeedServiceError::Invalid(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let feeds = self.feed_repo.find_page(query.last_feed_id, size).await?;

        let mut responses = Vec::with_capacity(feeds.len());
        for feed in feeds {
            responses.push(self.to_response(feed, member_id).await?);
        }
        Ok(responses)
    }

    async fn update_feed(
        &self,
        member_id: i64,
        feed_id: i64,
        request: FeedPatchRequest,
    ) -> Result<FeedResponse, FeedServiceError> {
        validate_request(&request)?;
        let mut feed = self.find_writable_feed(member_id, feed_id).await?;

        if let Some(contents) = request.contents {
            feed.contents = contents;
        }
        if let Some(location) = request.location {
            feed.location = location;
        }
        if let Some(tags) = request.tags {
            feed.tags = tags;
        }

        let feed = self.feed_repo.update(&feed).await?;
        tracing::info!(feed_id, member_id, "Feed updated");
        self.to_response(feed, member_id).await
    }

    async fn delete_feed(&self, member_id: i64, feed_id: i64) -> Result<(), FeedServiceError> {
        let feed = self.find_writable_feed(member_id, feed_id).await?;

        if !self.feed_repo.delete(feed_id).await? {
            return Err(FeedServiceError::NotFound);
        }
        if let Some(path) = feed.image_path.as_deref() {
            self.discard_image(path).await;
        }

        tracing::info!(feed_id, member_id, "Feed deleted");
        Ok(())
    }

    async fn do_like(&self, member_id: i64, feed_id: i64) -> Result<(), FeedServiceError> {
        self.find_feed(feed_id).await?;

        if !self.like_repo.insert(feed_id, member_id).await? {
            return Err(FeedServiceError::AlreadyLiked);
        }

        tracing::debug!(feed_id, member_id, "Feed liked");
        Ok(())
    }

    async fn cancel_like(&self, member_id: i64, feed_id: i64) -> Result<(), FeedServiceError> {
        self.find_feed(feed_id).await?;

        if !self.like_repo.delete(feed_id, member_id).await? {
            return Err(FeedServiceError::UnableToCancelLike);
        }

        tracing::debug!(feed_id, member_id, "Feed like cancelled");
        Ok(())
    }
}

impl FeedService {
    async fn find_feed(&self, feed_id: i64) -> Result<Feed, FeedServiceError> {
        self.feed_repo
            .find_by_id(feed_id)
            .await?
            .ok_or(FeedServiceError::NotFound)
    }

    async fn find_writable_feed(
        &self,
        member_id: i64,
        feed_id: i64,
    ) -> Result<Feed, FeedServiceError> {
        let feed = self.find_feed(feed_id).await?;
        if feed.member_id != member_id {
            return Err(FeedServiceError::NotWriter);
        }
        Ok(feed)
    }

    async fn store_image(&self, image: UploadedImage) -> Result<String, FeedServiceError> {
        let is_image = image
            .content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("image/"));
        if !is_image {
            return Err(FeedServiceError::Invalid(
                "file must be an image".to_string(),
            ));
        }

        self.image_store
            .store(image.file_name.as_deref(), image.bytes)
            .await
            .map_err(|err| match err {
                ImageStoreError::EmptyPayload | ImageStoreError::TooLarge { .. } => {
                    FeedServiceError::Invalid(err.to_string())
                }
                _ => FeedServiceError::Dependency(err.to_string()),
            })
    }

    async fn discard_image(&self, path: &str) {
        if let Err(err) = self.image_store.delete(path).await {
            tracing::warn!(error = %err, path, "Failed to remove feed image");
        }
    }

    async fn to_response(
        &self,
        feed: Feed,
        viewer_id: i64,
    ) -> Result<FeedResponse, FeedServiceError> {
        let writer = self
            .member_repo
            .find_by_id(feed.member_id)
            .await?
            .ok_or(FeedServiceError::MemberNotFound)?;
        let like_count = self.like_repo.count_for_feed(feed.id).await?;
        let liked = self.like_repo.exists(feed.id, viewer_id).await?;

        Ok(FeedResponse {
            id: feed.id,
            contents: feed.contents,
            nickname: writer.nickname,
            location: feed.location,
            tags: feed.tags,
            comment_count: i64::from(feed.comment_count),
            like_count,
            liked,
            image_url: feed.image_path.as_deref().map(ImageStore::url_for),
            created_at: feed.created_at,
        })
    }
}
