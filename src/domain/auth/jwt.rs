use crate::error::{AppError, AppResult, ErrorCode};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Member ID
    pub email: String,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

impl Claims {
    pub fn member_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Business(ErrorCode::InvalidAccessToken))
    }
}

#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    expiration_hours: i64,
}

impl JwtManager {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }

    pub fn expires_in_seconds(&self) -> i64 {
        self.expiration_hours * 3600
    }

    /// Generate a JWT access token for a member
    pub fn generate_token(&self, member_id: i64, email: &str) -> AppResult<String> {
        let now = Utc::now();
        self.generate_token_with_expiry(member_id, email, now + Duration::hours(self.expiration_hours))
    }

    pub fn generate_token_with_expiry(
        &self,
        member_id: i64,
        email: &str,
        expires_at: chrono::DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = Claims {
            sub: member_id.to_string(),
            email: email.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Business(ErrorCode::ExpiredAccessToken),
            _ => AppError::Business(ErrorCode::InvalidAccessToken),
        })
    }

    /// Read claims of a token whose signature is valid but which may have expired.
    pub fn decode_expired(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = false;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Business(ErrorCode::InvalidAccessToken))
    }
}

/// Generate a random refresh token
pub fn generate_refresh_token() -> String {
    Uuid::new_v4().to_string()
}
