use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::ValidationError;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Query string of GET /feed/tags
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSearchQuery {
    pub tag_name: String,
    pub size: Option<i64>,
}

/// Tag lists are stored exactly as submitted, so blank, padded or repeated
/// names are rejected instead of being rewritten.
pub fn validate_tag_names(names: &[String]) -> Result<(), ValidationError> {
    for (index, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(tag_error("must not contain blank tags"));
        }
        if name.trim() != name {
            return Err(tag_error("must not contain tags with surrounding whitespace"));
        }
        if names[..index].contains(name) {
            return Err(tag_error("must not contain duplicate tags"));
        }
    }
    Ok(())
}

fn tag_error(message: &'static str) -> ValidationError {
    ValidationError::new("tags").with_message(Cow::Borrowed(message))
}
