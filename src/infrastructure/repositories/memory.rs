//! In-process store used when no `DATABASE_URL` is configured.
//!
//! All tables live behind one lock so every repository call is atomic.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

use super::{FeedRepository, LikeRepository, MemberRepository, RefreshTokenRepository, TagRepository};
use crate::domain::feed::{Feed, NewFeed};
use crate::domain::member::Member;
use crate::domain::tag::Tag;
use crate::error::{AppError, AppResult, ErrorCode};

struct RefreshTokenRecord {
    member_id: i64,
    token: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

#[derive(Default)]
struct Tables {
    members: BTreeMap<i64, Member>,
    feeds: BTreeMap<i64, Feed>,
    tags: BTreeMap<i64, Tag>,
    likes: HashSet<(i64, i64)>,
    refresh_tokens: Vec<RefreshTokenRecord>,
    next_member_id: i64,
    next_feed_id: i64,
    next_tag_id: i64,
}

impl Tables {
    fn find_or_create_tag(&mut self, name: &str) -> Tag {
        if let Some(tag) = self.tags.values().find(|tag| tag.name == name) {
            return tag.clone();
        }
        self.next_tag_id += 1;
        let tag = Tag {
            id: self.next_tag_id,
            name: name.to_string(),
        };
        self.tags.insert(tag.id, tag.clone());
        tag
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn create(&self, email: &str, password_hash: &str, nickname: &str) -> AppResult<Member> {
        let mut tables = self.tables.write();
        if tables.members.values().any(|m| m.email == email) {
            return Err(AppError::Business(ErrorCode::DuplicateEmail));
        }

        tables.next_member_id += 1;
        let member = Member {
            id: tables.next_member_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            nickname: nickname.to_string(),
            created_at: Utc::now(),
        };
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn find_by_id(&self, member_id: i64) -> AppResult<Option<Member>> {
        Ok(self.tables.read().members.get(&member_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        Ok(self
            .tables
            .read()
            .members
            .values()
            .find(|m| m.email == email)
            .cloned())
    }
}

#[async_trait]
impl FeedRepository for InMemoryStore {
    async fn create(&self, feed: NewFeed) -> AppResult<Feed> {
        let mut tables = self.tables.write();
        if !tables.members.contains_key(&feed.member_id) {
            return Err(AppError::Business(ErrorCode::MemberNotFound));
        }
        for name in &feed.tags {
            tables.find_or_create_tag(name);
        }

        tables.next_feed_id += 1;
        let now = Utc::now();
        let feed = Feed {
            id: tables.next_feed_id,
            member_id: feed.member_id,
            contents: feed.contents,
            location: feed.location,
            tags: feed.tags,
            image_path: feed.image_path,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.feeds.insert(feed.id, feed.clone());
        Ok(feed)
    }

    async fn find_by_id(&self, feed_id: i64) -> AppResult<Option<Feed>> {
        Ok(self.tables.read().feeds.get(&feed_id).cloned())
    }

    async fn find_page(&self, last_feed_id: Option<i64>, size: i64) -> AppResult<Vec<Feed>> {
        let upper = last_feed_id.unwrap_or(i64::MAX);
        let take = usize::try_from(size).unwrap_or(0);

        Ok(self
            .tables
            .read()
            .feeds
            .range(..upper)
            .rev()
            .take(take)
            .map(|(_, feed)| feed.clone())
            .collect())
    }

    async fn update(&self, feed: &Feed) -> AppResult<Feed> {
        let mut tables = self.tables.write();
        for name in &feed.tags {
            tables.find_or_create_tag(name);
        }

        let stored = tables
            .feeds
            .get_mut(&feed.id)
            .ok_or(AppError::Business(ErrorCode::FeedNotFound))?;
        stored.contents = feed.contents.clone();
        stored.location = feed.location.clone();
        stored.tags = feed.tags.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, feed_id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write();
        let removed = tables.feeds.remove(&feed_id).is_some();
        if removed {
            tables.likes.retain(|(liked_feed, _)| *liked_feed != feed_id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_or_create(&self, name: &str) -> AppResult<Tag> {
        Ok(self.tables.write().find_or_create_tag(name))
    }

    async fn search(&self, fragment: &str, size: i64) -> AppResult<Vec<Tag>> {
        let needle = fragment.to_lowercase();
        let take = usize::try_from(size).unwrap_or(0);

        let mut found: Vec<Tag> = self
            .tables
            .read()
            .tags
            .values()
            .filter(|tag| tag.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        found.truncate(take);
        Ok(found)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn insert(&self, feed_id: i64, member_id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write();
        if !tables.feeds.contains_key(&feed_id) {
            return Err(AppError::Business(ErrorCode::FeedNotFound));
        }
        Ok(tables.likes.insert((feed_id, member_id)))
    }

    async fn delete(&self, feed_id: i64, member_id: i64) -> AppResult<bool> {
        Ok(self.tables.write().likes.remove(&(feed_id, member_id)))
    }

    async fn exists(&self, feed_id: i64, member_id: i64) -> AppResult<bool> {
        Ok(self.tables.read().likes.contains(&(feed_id, member_id)))
    }

    async fn count_for_feed(&self, feed_id: i64) -> AppResult<i64> {
        let count = self
            .tables
            .read()
            .likes
            .iter()
            .filter(|(liked_feed, _)| *liked_feed == feed_id)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn create(&self, member_id: i64, token: &str, expiration_days: i64) -> AppResult<()> {
        self.tables.write().refresh_tokens.push(RefreshTokenRecord {
            member_id,
            token: token.to_string(),
            expires_at: Utc::now() + Duration::days(expiration_days),
            revoked: false,
        });
        Ok(())
    }

    async fn find_valid(&self, token: &str) -> AppResult<Option<(i64, DateTime<Utc>)>> {
        let now = Utc::now();
        Ok(self
            .tables
            .read()
            .refresh_tokens
            .iter()
            .find(|r| r.token == token && !r.revoked && r.expires_at > now)
            .map(|r| (r.member_id, r.expires_at)))
    }

    async fn revoke(&self, token: &str) -> AppResult<bool> {
        let mut tables = self.tables.write();
        let mut revoked = false;
        for record in tables
            .refresh_tokens
            .iter_mut()
            .filter(|r| r.token == token && !r.revoked)
        {
            record.revoked = true;
            revoked = true;
        }
        Ok(revoked)
    }

    async fn revoke_all_for_member(&self, member_id: i64) -> AppResult<()> {
        for record in self
            .tables
            .write()
            .refresh_tokens
            .iter_mut()
            .filter(|r| r.member_id == member_id)
        {
            record.revoked = true;
        }
        Ok(())
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut tables = self.tables.write();
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|r| r.expires_at >= now);
        Ok((before - tables.refresh_tokens.len()) as u64)
    }
}
