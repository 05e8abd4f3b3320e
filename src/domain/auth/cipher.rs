//! AES-128-CBC encryption of refresh tokens handed out to clients.
//!
//! Clients never see the raw refresh token: they receive the base64 form of
//! its ciphertext and send it back in the `Refresh` header.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{AppError, AppResult, ErrorCode};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

pub const AES_KEY_LEN: usize = 16;

#[derive(Clone)]
pub struct RefreshTokenCipher {
    key: [u8; AES_KEY_LEN],
    iv: [u8; AES_KEY_LEN],
}

impl std::fmt::Debug for RefreshTokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenCipher").finish_non_exhaustive()
    }
}

impl RefreshTokenCipher {
    /// The IV is derived from the key, so equal plaintexts encrypt identically.
    pub fn new(secret_key: &str) -> AppResult<Self> {
        let key: [u8; AES_KEY_LEN] = secret_key.as_bytes().try_into().map_err(|_| {
            AppError::Internal(format!("AES key must be exactly {AES_KEY_LEN} bytes"))
        })?;

        Ok(Self { key, iv: key })
    }

    pub fn encrypt(&self, plain: &str) -> String {
        let ciphertext = Aes128CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes());
        STANDARD.encode(ciphertext)
    }

    pub fn decrypt(&self, encrypted: &str) -> AppResult<String> {
        let invalid = || AppError::Business(ErrorCode::InvalidRefreshToken);

        let ciphertext = STANDARD.decode(encrypted.trim()).map_err(|_| invalid())?;
        let plain = Aes128CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| invalid())?;

        String::from_utf8(plain).map_err(|_| invalid())
    }
}
