use async_trait::async_trait;
use std::sync::Arc;

use super::{normalize_email, Member, MemberResponse, MemberServiceError, SignUpRequest};
use crate::domain::auth::hash_password;
use crate::domain::shared::validate_request;
use crate::infrastructure::repositories::MemberRepository;

pub struct MemberService {
    member_repo: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(member_repo: Arc<dyn MemberRepository>) -> Self {
        Self { member_repo }
    }
}

#[async_trait]
pub trait MemberServiceApi: Send + Sync {
    async fn sign_up(&self, request: SignUpRequest) -> Result<MemberResponse, MemberServiceError>;

    async fn find_member(&self, member_id: i64) -> Result<Member, MemberServiceError>;

    async fn find_member_by_email(&self, email: &str) -> Result<Member, MemberServiceError>;
}

#[async_trait]
impl MemberServiceApi for MemberService {
    async fn sign_up(&self, request: SignUpRequest) -> Result<MemberResponse, MemberServiceError> {
        let request = SignUpRequest {
            email: normalize_email(&request.email),
            nickname: request.nickname.trim().to_string(),
            ..request
        };
        validate_request(&request)?;

        if self.member_repo.find_by_email(&request.email).await?.is_some() {
            return Err(MemberServiceError::DuplicateEmail);
        }

        let password_hash = hash_password(&request.password)?;
        let member = self
            .member_repo
            .create(&request.email, &password_hash, &request.nickname)
            .await?;

        tracing::info!(member_id = member.id, "Member signed up");
        Ok(MemberResponse::from(member))
    }

    async fn find_member(&self, member_id: i64) -> Result<Member, MemberServiceError> {
        self.member_repo
            .find_by_id(member_id)
            .await?
            .ok_or(MemberServiceError::NotFound)
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Member, MemberServiceError> {
        self.member_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(MemberServiceError::NotFound)
    }
}
