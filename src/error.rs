use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Business error kinds with a stable status and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MemberNotFound,
    DuplicateEmail,
    InvalidCredentials,
    FeedNotFound,
    NotFeedWriter,
    AlreadyLikedFeed,
    UnableToCancelLike,
    MissingAccessToken,
    InvalidAccessToken,
    ExpiredAccessToken,
    InvalidRefreshToken,
}

impl ErrorCode {
    pub fn status(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MemberNotFound | Self::FeedNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateEmail | Self::AlreadyLikedFeed | Self::UnableToCancelLike => {
                StatusCode::CONFLICT
            }
            Self::NotFeedWriter => StatusCode::FORBIDDEN,
            Self::InvalidCredentials
            | Self::MissingAccessToken
            | Self::InvalidAccessToken
            | Self::ExpiredAccessToken
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MemberNotFound => "Member not found",
            Self::DuplicateEmail => "Email is already registered",
            Self::InvalidCredentials => "Email or password does not match",
            Self::FeedNotFound => "Feed not found",
            Self::NotFeedWriter => "Only the writer can modify this feed",
            Self::AlreadyLikedFeed => "Feed is already liked",
            Self::UnableToCancelLike => "Cannot cancel a like that was never made",
            Self::MissingAccessToken => "Access token is missing",
            Self::InvalidAccessToken => "Access token is invalid",
            Self::ExpiredAccessToken => "Access token has expired",
            Self::InvalidRefreshToken => "Refresh token is invalid or expired",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Business(ErrorCode),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::Business(code)
    }
}

/// Error payload returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Business(code) => code.status_code(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code().as_u16(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
