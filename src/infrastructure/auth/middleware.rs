use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::auth::AuthService;
use crate::error::{AppError, ErrorCode};

/// Header carrying the AES-encrypted refresh token
pub const REFRESH_HEADER: &str = "refresh";
pub const BEARER_PREFIX: &str = "Bearer ";

/// Member context injected into request extensions after authentication
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub member_id: i64,
    pub email: String,
}

/// Read the bearer token, if any. A malformed Authorization header is rejected.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Business(ErrorCode::InvalidAccessToken))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AppError::Business(ErrorCode::InvalidAccessToken))?;

    Ok(Some(token.trim().to_string()))
}

pub fn refresh_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REFRESH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Authentication middleware
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access_token = bearer_token(request.headers())?;
    let refresh_token = refresh_token(request.headers());

    let authenticated = auth_service
        .authenticate(access_token.as_deref(), refresh_token.as_deref())
        .await?;

    request.extensions_mut().insert(AuthUser {
        member_id: authenticated.member.id,
        email: authenticated.member.email,
    });

    let mut response = next.run(request).await;

    // Expired access token was replaced; hand the new one back to the client
    if let Some(reissued) = authenticated.reissued_access_token {
        if let Ok(value) = HeaderValue::from_str(&format!("{BEARER_PREFIX}{reissued}")) {
            response.headers_mut().insert(header::AUTHORIZATION, value);
        }
    }

    Ok(response)
}
