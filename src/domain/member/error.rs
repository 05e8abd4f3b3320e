use crate::error::{AppError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum MemberServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("member not found")]
    NotFound,
    #[error("email already registered")]
    DuplicateEmail,
}

impl From<AppError> for MemberServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => MemberServiceError::Invalid(msg),
            AppError::Business(ErrorCode::MemberNotFound) => MemberServiceError::NotFound,
            AppError::Business(ErrorCode::DuplicateEmail) => MemberServiceError::DuplicateEmail,
            _ => MemberServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<MemberServiceError> for AppError {
    fn from(err: MemberServiceError) -> Self {
        match err {
            MemberServiceError::Invalid(msg) => AppError::BadRequest(msg),
            MemberServiceError::NotFound => AppError::Business(ErrorCode::MemberNotFound),
            MemberServiceError::DuplicateEmail => AppError::Business(ErrorCode::DuplicateEmail),
            MemberServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
