//! Dependency wiring shared by the binary and the integration tests.

use std::sync::Arc;

use crate::domain::auth::AuthService;
use crate::domain::feed::FeedService;
use crate::domain::member::MemberService;
use crate::domain::tag::TagService;
use crate::error::AppError;
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::repositories::{
    FeedRepository, InMemoryStore, LikeRepository, MemberRepository, PgFeedRepository,
    PgLikeRepository, PgMemberRepository, PgRefreshTokenRepository, PgTagRepository,
    RefreshTokenRepository, TagRepository,
};
use crate::infrastructure::storage::ImageStore;

/// Repository set backing the services
#[derive(Clone)]
pub struct Repositories {
    pub member: Arc<dyn MemberRepository>,
    pub feed: Arc<dyn FeedRepository>,
    pub tag: Arc<dyn TagRepository>,
    pub like: Arc<dyn LikeRepository>,
    pub refresh_token: Arc<dyn RefreshTokenRepository>,
    /// Present only for the Postgres backend; drives the readiness probe.
    pub pool: Option<Arc<DbPool>>,
}

impl Repositories {
    pub fn postgres(pool: Arc<DbPool>) -> Self {
        Self {
            member: Arc::new(PgMemberRepository::new(pool.clone())),
            feed: Arc::new(PgFeedRepository::new(pool.clone())),
            tag: Arc::new(PgTagRepository::new(pool.clone())),
            like: Arc::new(PgLikeRepository::new(pool.clone())),
            refresh_token: Arc::new(PgRefreshTokenRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    pub fn from_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            member: store.clone(),
            feed: store.clone(),
            tag: store.clone(),
            like: store.clone(),
            refresh_token: store,
            pool: None,
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub member: Arc<MemberService>,
    pub feed: Arc<FeedService>,
    pub tag: Arc<TagService>,
}

impl AppServices {
    pub fn new(config: &Config, repos: &Repositories) -> Result<Self, AppError> {
        let image_store = Arc::new(ImageStore::new(
            config.upload_dir.clone(),
            config.max_upload_bytes,
        ));

        Ok(Self {
            auth: Arc::new(AuthService::new(
                repos.member.clone(),
                repos.refresh_token.clone(),
                config,
            )?),
            member: Arc::new(MemberService::new(repos.member.clone())),
            feed: Arc::new(FeedService::new(
                repos.feed.clone(),
                repos.member.clone(),
                repos.like.clone(),
                image_store,
            )),
            tag: Arc::new(TagService::new(repos.tag.clone())),
        })
    }
}
