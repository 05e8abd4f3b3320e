use crate::error::{AppError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("access token error: {0}")]
    AccessToken(ErrorCode),
}

impl From<AppError> for AuthServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Business(ErrorCode::InvalidCredentials) => AuthServiceError::InvalidCredentials,
            AppError::Business(ErrorCode::InvalidRefreshToken) => {
                AuthServiceError::InvalidRefreshToken
            }
            AppError::Business(
                code @ (ErrorCode::MissingAccessToken
                | ErrorCode::InvalidAccessToken
                | ErrorCode::ExpiredAccessToken),
            ) => AuthServiceError::AccessToken(code),
            _ => AuthServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::Business(ErrorCode::InvalidCredentials),
            AuthServiceError::InvalidRefreshToken => {
                AppError::Business(ErrorCode::InvalidRefreshToken)
            }
            AuthServiceError::AccessToken(code) => AppError::Business(code),
            AuthServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
