use async_trait::async_trait;
use std::sync::Arc;

use super::LikeRepository;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::infrastructure::db::DbPool;

const MEMBER_FK: &str = "feed_likes_member_id_fkey";

pub struct PgLikeRepository {
    pool: Arc<DbPool>,
}

impl PgLikeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn insert(&self, feed_id: i64, member_id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            INSERT INTO feed_likes (feed_id, member_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (feed_id, member_id) DO NOTHING
            "#,
        )
        .bind(feed_id)
        .bind(member_id)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    let code = if db_err.constraint() == Some(MEMBER_FK) {
                        ErrorCode::MemberNotFound
                    } else {
                        ErrorCode::FeedNotFound
                    };
                    return AppError::Business(code);
                }
            }
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, feed_id: i64, member_id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM feed_likes WHERE feed_id = $1 AND member_id = $2")
            .bind(feed_id)
            .bind(member_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, feed_id: i64, member_id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM feed_likes
                WHERE feed_id = $1 AND member_id = $2
            )
            "#,
        )
        .bind(feed_id)
        .bind(member_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    async fn count_for_feed(&self, feed_id: i64) -> AppResult<i64> {
        let pool = self.pool.as_ref();
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feed_likes WHERE feed_id = $1")
                .bind(feed_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
