use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;

use super::FeedRepository;
use crate::domain::feed::{Feed, NewFeed};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::infrastructure::db::DbPool;

/// Feed columns plus the ordered tag names gathered from `feed_tags`.
const FEED_SELECT: &str = r#"
    SELECT f.id, f.member_id, f.contents, f.location, f.image_path, f.comment_count,
           f.created_at, f.updated_at,
           ARRAY(
               SELECT t.name
               FROM feed_tags ft
               JOIN tags t ON t.id = ft.tag_id
               WHERE ft.feed_id = f.id
               ORDER BY ft.position
           ) AS tags
    FROM feeds f
"#;

pub struct PgFeedRepository {
    pool: Arc<DbPool>,
}

impl PgFeedRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    async fn replace_tags(
        tx: &mut Transaction<'_, Postgres>,
        feed_id: i64,
        tags: &[String],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM feed_tags WHERE feed_id = $1")
            .bind(feed_id)
            .execute(&mut **tx)
            .await?;

        for (position, name) in tags.iter().enumerate() {
            let tag_id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO tags (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;

            sqlx::query("INSERT INTO feed_tags (feed_id, tag_id, position) VALUES ($1, $2, $3)")
                .bind(feed_id)
                .bind(tag_id)
                .bind(position as i32)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    async fn load(&self, feed_id: i64) -> AppResult<Feed> {
        self.find_by_id(feed_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Feed {feed_id} vanished after write")))
    }
}

#[async_trait]
impl FeedRepository for PgFeedRepository {
    async fn create(&self, feed: NewFeed) -> AppResult<Feed> {
        let mut tx = self.pool.begin().await?;

        let feed_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO feeds (member_id, contents, location, image_path, comment_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(feed.member_id)
        .bind(&feed.contents)
        .bind(&feed.location)
        .bind(&feed.image_path)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return AppError::Business(ErrorCode::MemberNotFound);
                }
            }
            AppError::Database(e)
        })?;

        Self::replace_tags(&mut tx, feed_id, &feed.tags).await?;
        tx.commit().await?;

        self.load(feed_id).await
    }

    async fn find_by_id(&self, feed_id: i64) -> AppResult<Option<Feed>> {
        let pool = self.pool.as_ref();
        let sql = format!("{FEED_SELECT} WHERE f.id = $1");
        let feed = sqlx::query_as::<_, Feed>(&sql)
            .bind(feed_id)
            .fetch_optional(pool)
            .await?;

        Ok(feed)
    }

    async fn find_page(&self, last_feed_id: Option<i64>, size: i64) -> AppResult<Vec<Feed>> {
        let pool = self.pool.as_ref();
        let sql = format!(
            "{FEED_SELECT} WHERE ($1::BIGINT IS NULL OR f.id < $1) ORDER BY f.id DESC LIMIT $2"
        );
        let feeds = sqlx::query_as::<_, Feed>(&sql)
            .bind(last_feed_id)
            .bind(size)
            .fetch_all(pool)
            .await?;

        Ok(feeds)
    }

    async fn update(&self, feed: &Feed) -> AppResult<Feed> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE feeds
            SET contents = $1, location = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(&feed.contents)
        .bind(&feed.location)
        .bind(feed.id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::Business(ErrorCode::FeedNotFound));
        }

        Self::replace_tags(&mut tx, feed.id, &feed.tags).await?;
        tx.commit().await?;

        self.load(feed.id).await
    }

    async fn delete(&self, feed_id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM feeds WHERE id = $1")
            .bind(feed_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
