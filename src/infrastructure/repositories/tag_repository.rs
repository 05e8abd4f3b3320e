use async_trait::async_trait;
use std::sync::Arc;

use super::{escape_like, TagRepository};
use crate::domain::tag::Tag;
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;

pub struct PgTagRepository {
    pool: Arc<DbPool>,
}

impl PgTagRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_or_create(&self, name: &str) -> AppResult<Tag> {
        let pool = self.pool.as_ref();
        // DO UPDATE (not DO NOTHING) so RETURNING yields the existing row too
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    async fn search(&self, fragment: &str, size: i64) -> AppResult<Vec<Tag>> {
        let pool = self.pool.as_ref();
        let pattern = format!("%{}%", escape_like(fragment));
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name
            FROM tags
            WHERE name ILIKE $1
            ORDER BY LOWER(name), name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(size)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
