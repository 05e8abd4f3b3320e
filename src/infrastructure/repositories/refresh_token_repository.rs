use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::RefreshTokenRepository;
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;

pub struct PgRefreshTokenRepository {
    pool: Arc<DbPool>,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn create(&self, member_id: i64, token: &str, expiration_days: i64) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let now = Utc::now();
        let expires_at = now + Duration::days(expiration_days);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, member_id, token, expires_at, created_at, revoked)
            VALUES ($1, $2, $3, $4, $5, false)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(member_id)
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn find_valid(&self, token: &str) -> AppResult<Option<(i64, DateTime<Utc>)>> {
        let pool = self.pool.as_ref();
        let result = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            r#"
            SELECT member_id, expires_at
            FROM refresh_tokens
            WHERE token = $1
              AND NOT revoked
              AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(result)
    }

    async fn revoke(&self, token: &str) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result =
            sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE token = $1 AND NOT revoked")
                .bind(token)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_member(&self, member_id: i64) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE member_id = $1 AND NOT revoked
            "#,
        )
        .bind(member_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
