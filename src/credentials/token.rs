//! Opaque token issuance.
//!
//! Tokens are 32 random bytes, base64url without padding. They are not stored
//! and carry no claims, so nothing can verify them later. [`TokenVerifier`]
//! names that gap: [`UnverifiedTokens`] is the only implementation and it
//! rejects everything.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};

pub trait TokenIssuer: Send + Sync {
    /// Issue a fresh token.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    fn issue(&self) -> Result<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTokens;

impl TokenIssuer for RandomTokens {
    fn issue(&self) -> Result<String> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to generate session token")?;
        Ok(Base64UrlUnpadded::encode_string(&bytes))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenStatus {
    Valid { user_id: String },
    /// The token cannot be tied to any account.
    Unverifiable,
}

/// Check a presented token. No route calls this yet.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> TokenStatus;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnverifiedTokens;

impl TokenVerifier for UnverifiedTokens {
    fn verify(&self, _token: &str) -> TokenStatus {
        TokenStatus::Unverifiable
    }
}
