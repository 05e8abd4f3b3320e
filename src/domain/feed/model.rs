use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Feed {
    pub id: i64,
    pub member_id: i64,
    pub contents: String,
    pub location: String,
    /// Tag names in the order the writer gave them.
    pub tags: Vec<String>,
    pub image_path: Option<String>,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values needed to insert a feed; ids and timestamps come from the store.
#[derive(Debug, Clone)]
pub struct NewFeed {
    pub member_id: i64,
    pub contents: String,
    pub location: String,
    pub tags: Vec<String>,
    pub image_path: Option<String>,
}
