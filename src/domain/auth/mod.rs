pub mod cipher;
pub mod dto;
pub mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use cipher::RefreshTokenCipher;
pub use dto::{LoginRequest, TokenResponse};
pub use error::AuthServiceError;
pub use jwt::{generate_refresh_token, Claims, JwtManager};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, Authenticated};
