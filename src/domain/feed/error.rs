use crate::error::{AppError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum FeedServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("feed not found")]
    NotFound,
    #[error("member not found")]
    MemberNotFound,
    #[error("member is not the writer of the feed")]
    NotWriter,
    #[error("feed already liked")]
    AlreadyLiked,
    #[error("feed was not liked")]
    UnableToCancelLike,
}

impl From<AppError> for FeedServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => FeedServiceError::Invalid(msg),
            AppError::Business(ErrorCode::FeedNotFound) => FeedServiceError::NotFound,
            AppError::Business(ErrorCode::MemberNotFound) => FeedServiceError::MemberNotFound,
            AppError::Business(ErrorCode::NotFeedWriter) => FeedServiceError::NotWriter,
            AppError::Business(ErrorCode::AlreadyLikedFeed) => FeedServiceError::AlreadyLiked,
            AppError::Business(ErrorCode::UnableToCancelLike) => {
                FeedServiceError::UnableToCancelLike
            }
            _ => FeedServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<FeedServiceError> for AppError {
    fn from(err: FeedServiceError) -> Self {
        match err {
            FeedServiceError::Invalid(msg) => AppError::BadRequest(msg),
            FeedServiceError::NotFound => AppError::Business(ErrorCode::FeedNotFound),
            FeedServiceError::MemberNotFound => AppError::Business(ErrorCode::MemberNotFound),
            FeedServiceError::NotWriter => AppError::Business(ErrorCode::NotFeedWriter),
            FeedServiceError::AlreadyLiked => AppError::Business(ErrorCode::AlreadyLikedFeed),
            FeedServiceError::UnableToCancelLike => {
                AppError::Business(ErrorCode::UnableToCancelLike)
            }
            FeedServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
