//! Opaque file tokens.
//!
//! A token is `base64url(version || nonce || AES-256-GCM(folder/filename))`.
//! The cipher key is derived from the configured secret with HKDF-SHA256, so
//! tokens only decode under the secret that issued them.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use common::StorageKey;
use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

/// Leading byte of every token; also bound as associated data
const TOKEN_VERSION: u8 = 0x01;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

const KEY_SALT: &[u8] = b"fileuploader.token-codec";
const KEY_INFO: &[u8] = b"storage-key-token/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Token signing secret is not configured")]
    MissingSecret,
    #[error("Failed to derive token key")]
    KeyDerivation,
    #[error("Failed to encrypt storage key")]
    Encryption,
}

/// The only decode failure callers get to see
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Invalid token")]
pub struct InvalidToken;

/// Encodes storage keys into tokens and back
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl TokenCodec {
    /// Build a codec from the signing secret. An empty secret is a
    /// configuration error.
    pub fn new(secret: &str) -> Result<Self, CodecError> {
        if secret.trim().is_empty() {
            return Err(CodecError::MissingSecret);
        }

        let hkdf = Hkdf::<Sha256>::new(Some(KEY_SALT), secret.as_bytes());
        let mut key_bytes = [0u8; 32];
        hkdf.expand(KEY_INFO, &mut key_bytes)
            .map_err(|_| CodecError::KeyDerivation)?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Ok(Self { cipher })
    }

    /// Encode `folder/filename` into a fresh token. Every call uses a new
    /// random nonce, so encoding the same key twice yields different tokens.
    pub fn encode(&self, folder: &str, filename: &str) -> Result<String, CodecError> {
        let plaintext = format!("{}/{}", folder, filename);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &[TOKEN_VERSION],
                },
            )
            .map_err(|_| CodecError::Encryption)?;

        let mut raw = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    pub fn encode_key(&self, key: &StorageKey) -> Result<String, CodecError> {
        self.encode(&key.folder, &key.filename)
    }

    /// Decode a token back into its storage key
    pub fn decode(&self, token: &str) -> Result<StorageKey, InvalidToken> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| InvalidToken)?;

        if raw.len() < 1 + NONCE_LEN + TAG_LEN || raw[0] != TOKEN_VERSION {
            return Err(InvalidToken);
        }

        let (version, rest) = raw.split_at(1);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: version,
                },
            )
            .map_err(|_| InvalidToken)?;

        let path = String::from_utf8(plaintext).map_err(|_| InvalidToken)?;
        StorageKey::parse(&path).ok_or(InvalidToken)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
