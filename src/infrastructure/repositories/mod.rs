//! Persistence seams. Each trait has a Postgres implementation backed by
//! `sqlx` and is also implemented by [`InMemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::feed::{Feed, NewFeed};
use crate::domain::member::Member;
use crate::domain::tag::Tag;
use crate::error::AppResult;

pub mod feed_repository;
pub mod like_repository;
pub mod member_repository;
pub mod memory;
pub mod refresh_token_repository;
pub mod tag_repository;

pub use feed_repository::PgFeedRepository;
pub use like_repository::PgLikeRepository;
pub use member_repository::PgMemberRepository;
pub use memory::InMemoryStore;
pub use refresh_token_repository::PgRefreshTokenRepository;
pub use tag_repository::PgTagRepository;

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a member. A taken email yields `ErrorCode::DuplicateEmail`.
    async fn create(&self, email: &str, password_hash: &str, nickname: &str) -> AppResult<Member>;

    async fn find_by_id(&self, member_id: i64) -> AppResult<Option<Member>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Member>>;
}

#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Insert a feed, registering any tag names not yet in the catalog.
    async fn create(&self, feed: NewFeed) -> AppResult<Feed>;

    async fn find_by_id(&self, feed_id: i64) -> AppResult<Option<Feed>>;

    /// Feeds with an id below `last_feed_id` (or all), newest first.
    async fn find_page(&self, last_feed_id: Option<i64>, size: i64) -> AppResult<Vec<Feed>>;

    /// Persist contents, location and tags of an existing feed.
    async fn update(&self, feed: &Feed) -> AppResult<Feed>;

    async fn delete(&self, feed_id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_or_create(&self, name: &str) -> AppResult<Tag>;

    async fn search(&self, fragment: &str, size: i64) -> AppResult<Vec<Tag>>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Returns false when the member already likes the feed.
    async fn insert(&self, feed_id: i64, member_id: i64) -> AppResult<bool>;

    /// Returns false when there was no like to remove.
    async fn delete(&self, feed_id: i64, member_id: i64) -> AppResult<bool>;

    async fn exists(&self, feed_id: i64, member_id: i64) -> AppResult<bool>;

    async fn count_for_feed(&self, feed_id: i64) -> AppResult<i64>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, member_id: i64, token: &str, expiration_days: i64) -> AppResult<()>;

    /// Member and expiry of a non-revoked, non-expired token
    async fn find_valid(&self, token: &str) -> AppResult<Option<(i64, DateTime<Utc>)>>;

    /// Revoke a live token. Returns false when it was already revoked or unknown.
    async fn revoke(&self, token: &str) -> AppResult<bool>;

    async fn revoke_all_for_member(&self, member_id: i64) -> AppResult<()>;

    /// Delete expired refresh tokens (cleanup)
    async fn delete_expired(&self) -> AppResult<u64>;
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE patterns.
pub(crate) fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
