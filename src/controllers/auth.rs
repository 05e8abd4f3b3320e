use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::auth::{AuthService, LoginRequest, TokenResponse};
use crate::domain::shared::DataResponse;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::infrastructure::auth::{refresh_token, AuthUser, BEARER_PREFIX, REFRESH_HEADER};

pub struct AuthController {
    auth_service: Arc<AuthService>,
}

impl AuthController {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }

    /// POST /auth/login - Exchange email and password for a token pair
    pub async fn login(
        State(controller): State<Arc<AuthController>>,
        request: Result<Json<LoginRequest>, JsonRejection>,
    ) -> AppResult<(HeaderMap, Json<DataResponse<TokenResponse>>)> {
        let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let tokens = controller.auth_service.login(request).await?;
        Ok((token_headers(&tokens), Json(DataResponse::new(tokens))))
    }

    /// POST /auth/reissue - Rotate the token pair using the `Refresh` header
    pub async fn reissue(
        State(controller): State<Arc<AuthController>>,
        headers: HeaderMap,
    ) -> AppResult<(HeaderMap, Json<DataResponse<TokenResponse>>)> {
        let encrypted = refresh_token(&headers)
            .ok_or(AppError::Business(ErrorCode::InvalidRefreshToken))?;
        let tokens = controller.auth_service.reissue(&encrypted).await?;
        Ok((token_headers(&tokens), Json(DataResponse::new(tokens))))
    }

    /// POST /auth/logout - Revoke every refresh token of the caller
    pub async fn logout(
        State(controller): State<Arc<AuthController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<StatusCode> {
        controller.auth_service.logout(auth_user.member_id).await?;
        Ok(StatusCode::OK)
    }
}

/// Mirror the issued tokens into the `Authorization` and `Refresh` headers
fn token_headers(tokens: &TokenResponse) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", tokens.access_token)) {
        headers.insert(header::AUTHORIZATION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&tokens.refresh_token) {
        headers.insert(HeaderName::from_static(REFRESH_HEADER), value);
    }
    headers
}
