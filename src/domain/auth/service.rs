use std::sync::Arc;

use super::{
    generate_refresh_token, verify_password, AuthServiceError, JwtManager, LoginRequest,
    RefreshTokenCipher, TokenResponse,
};
use crate::domain::member::{normalize_email, Member};
use crate::error::{AppError, ErrorCode};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{MemberRepository, RefreshTokenRepository};

/// Result of authenticating a request.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub member: Member,
    /// Set when the access token had expired and was replaced using the refresh token.
    pub reissued_access_token: Option<String>,
}

pub struct AuthService {
    member_repo: Arc<dyn MemberRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    jwt: JwtManager,
    cipher: RefreshTokenCipher,
    refresh_token_expiration_days: i64,
}

impl AuthService {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        config: &Config,
    ) -> Result<Self, AppError> {
        Ok(Self {
            member_repo,
            refresh_token_repo,
            jwt: JwtManager::new(config.jwt_secret.clone(), config.jwt_expiration_hours),
            cipher: RefreshTokenCipher::new(&config.aes_secret_key)?,
            refresh_token_expiration_days: config.refresh_token_expiration_days,
        })
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    pub fn cipher(&self) -> &RefreshTokenCipher {
        &self.cipher
    }

    /// Verify email and password, then issue a token pair
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AuthServiceError> {
        let member = self
            .member_repo
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &member.password_hash)? {
            tracing::info!(member_id = member.id, "Login rejected: password mismatch");
            return Err(AuthServiceError::InvalidCredentials);
        }

        tracing::info!(member_id = member.id, "Member logged in");
        self.create_tokens_for_member(&member).await
    }

    /// Issue an access token and a stored, encrypted refresh token
    pub async fn create_tokens_for_member(
        &self,
        member: &Member,
    ) -> Result<TokenResponse, AuthServiceError> {
        let access_token = self.jwt.generate_token(member.id, &member.email)?;
        let refresh_token = generate_refresh_token();

        self.refresh_token_repo
            .create(member.id, &refresh_token, self.refresh_token_expiration_days)
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token: self.cipher.encrypt(&refresh_token),
            expires_in: self.jwt.expires_in_seconds(),
        })
    }

    /// Rotate the token pair: the presented refresh token is revoked
    pub async fn reissue(&self, encrypted_refresh: &str) -> Result<TokenResponse, AuthServiceError> {
        let refresh_token = self.cipher.decrypt(encrypted_refresh)?;
        let member = self.member_for_refresh_token(&refresh_token).await?;

        // Only the request that actually revokes the token may rotate it
        if !self.refresh_token_repo.revoke(&refresh_token).await? {
            tracing::warn!(member_id = member.id, "Refresh token already spent");
            return Err(AuthServiceError::InvalidRefreshToken);
        }
        tracing::info!(member_id = member.id, "Refresh token rotated");

        self.create_tokens_for_member(&member).await
    }

    /// Revoke every refresh token of the member
    pub async fn logout(&self, member_id: i64) -> Result<(), AuthServiceError> {
        self.refresh_token_repo
            .revoke_all_for_member(member_id)
            .await?;
        tracing::info!(member_id, "Member logged out");
        Ok(())
    }

    /// Resolve the member behind an access token. An expired access token is
    /// accepted when a valid refresh token of the same member accompanies it.
    pub async fn authenticate(
        &self,
        access_token: Option<&str>,
        encrypted_refresh: Option<&str>,
    ) -> Result<Authenticated, AuthServiceError> {
        let access_token =
            access_token.ok_or(AuthServiceError::AccessToken(ErrorCode::MissingAccessToken))?;

        match self.jwt.validate_token(access_token) {
            Ok(claims) => {
                let member = self.find_member(claims.member_id()?).await?;
                Ok(Authenticated {
                    member,
                    reissued_access_token: None,
                })
            }
            Err(AppError::Business(ErrorCode::ExpiredAccessToken)) => {
                let Some(encrypted_refresh) = encrypted_refresh else {
                    return Err(AuthServiceError::AccessToken(ErrorCode::ExpiredAccessToken));
                };

                let claims = self.jwt.decode_expired(access_token)?;
                let refresh_token = self.cipher.decrypt(encrypted_refresh)?;
                let member = self.member_for_refresh_token(&refresh_token).await?;
                if member.id != claims.member_id()? {
                    return Err(AuthServiceError::InvalidRefreshToken);
                }

                let reissued = self.jwt.generate_token(member.id, &member.email)?;
                tracing::debug!(member_id = member.id, "Access token reissued from refresh token");

                Ok(Authenticated {
                    member,
                    reissued_access_token: Some(reissued),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn member_for_refresh_token(&self, refresh_token: &str) -> Result<Member, AuthServiceError> {
        let (member_id, _expires_at) = self
            .refresh_token_repo
            .find_valid(refresh_token)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        self.member_repo
            .find_by_id(member_id)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)
    }

    async fn find_member(&self, member_id: i64) -> Result<Member, AuthServiceError> {
        self.member_repo
            .find_by_id(member_id)
            .await?
            .ok_or(AuthServiceError::AccessToken(ErrorCode::InvalidAccessToken))
    }
}
