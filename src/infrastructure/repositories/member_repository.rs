use async_trait::async_trait;
use std::sync::Arc;

use super::MemberRepository;
use crate::domain::member::Member;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::infrastructure::db::DbPool;

pub struct PgMemberRepository {
    pool: Arc<DbPool>,
}

impl PgMemberRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn create(&self, email: &str, password_hash: &str, nickname: &str) -> AppResult<Member> {
        let pool = self.pool.as_ref();
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (email, password_hash, nickname, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, email, password_hash, nickname, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(nickname)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Business(ErrorCode::DuplicateEmail);
                }
            }
            AppError::Database(e)
        })?;

        Ok(member)
    }

    async fn find_by_id(&self, member_id: i64) -> AppResult<Option<Member>> {
        let pool = self.pool.as_ref();
        let member = sqlx::query_as::<_, Member>(
            "SELECT id, email, password_hash, nickname, created_at FROM members WHERE id = $1",
        )
        .bind(member_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        let pool = self.pool.as_ref();
        let member = sqlx::query_as::<_, Member>(
            "SELECT id, email, password_hash, nickname, created_at FROM members WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }
}
