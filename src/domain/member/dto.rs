use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Member;

/// Request body for POST /members/signup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 64, message = "must be between 8 and 64 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 30, message = "must be between 1 and 30 characters"))]
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            email: member.email,
            nickname: member.nickname,
        }
    }
}
