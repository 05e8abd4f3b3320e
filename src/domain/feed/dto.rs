use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::tag::validate_tag_names;

/// JSON part of POST /feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedPostRequest {
    #[validate(length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"))]
    pub contents: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub location: String,
    #[serde(default)]
    #[validate(
        length(max = 10, message = "must have at most 10 tags"),
        custom(function = "validate_tag_names")
    )]
    pub tags: Vec<String>,
}

/// Body of PATCH /feed/{id}; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedPatchRequest {
    #[validate(length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"))]
    pub contents: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(
        length(max = 10, message = "must have at most 10 tags"),
        custom(function = "validate_tag_names")
    )]
    pub tags: Option<Vec<String>>,
}

/// Response for feed endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub id: i64,
    pub contents: String,
    pub nickname: String,
    pub location: String,
    pub tags: Vec<String>,
    pub comment_count: i64,
    pub like_count: i64,
    /// Whether the requesting member likes this feed
    pub liked: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query string of GET /feed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedListQuery {
    pub last_feed_id: Option<i64>,
    pub size: Option<i64>,
}

/// Image part of POST /feed
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}
